//! HTML body and subject of the winner email.
//!
//! Every notice field is HTML-escaped before interpolation.

use crate::domain::WinnerNotice;

pub(super) fn subject(notice: &WinnerNotice) -> String {
    format!(
        "\u{1f389} YOU WON! Claim Your {} Prize from Done For You Pros!",
        notice.prize_value
    )
}

pub(super) fn render(notice: &WinnerNotice) -> String {
    let user_name = escape_html(&notice.user_name);
    let prize_name = escape_html(&notice.prize_name);
    let prize_value = escape_html(&notice.prize_value);
    let phone = escape_html(&notice.phone_number);
    let tel: String = notice
        .phone_number
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>You Won! Claim Your Prize Now!</title>
</head>
<body style="margin:0;padding:20px;background:#f4f4f4;font-family:Arial,sans-serif;">
<div style="max-width:600px;margin:0 auto;background:#ffffff;border-radius:12px;overflow:hidden;">
  <div style="background:#1a1a2e;color:#ffffff;padding:32px;text-align:center;">
    <div style="font-size:22px;font-weight:bold;">DONE FOR YOU PROS</div>
    <h1 style="margin:16px 0 4px;">CONGRATULATIONS!</h1>
    <p style="margin:0;">You Won Our Scratch &amp; Win Game!</p>
  </div>
  <div style="padding:32px;">
    <h2 style="text-align:center;color:#e85d04;">WINNER!</h2>
    <p style="text-align:center;font-size:18px;">Dear {user_name},</p>
    <div style="border:3px dashed #e85d04;border-radius:12px;padding:24px;text-align:center;margin:24px 0;">
      <div style="font-size:14px;letter-spacing:2px;">YOUR PRIZE</div>
      <div style="font-size:20px;font-weight:bold;margin:8px 0;">{prize_name}</div>
      <div style="font-size:32px;font-weight:bold;color:#2d6a4f;">{prize_value}</div>
    </div>
    <div style="text-align:center;">
      <h3>CLAIM YOUR PRIZE NOW!</h3>
      <p>Call us immediately to claim your prize and schedule your installation!</p>
      <a href="tel:{tel}" style="display:inline-block;background:#e85d04;color:#ffffff;padding:14px 28px;border-radius:30px;text-decoration:none;font-weight:bold;">{phone}</a>
    </div>
    <h3>Important Information:</h3>
    <ul>
      <li>Have your winning confirmation email ready when you call</li>
      <li>Prize must be claimed within 30 days of winning</li>
      <li>Installation scheduled at your convenience</li>
      <li>All parts and labor included in your prize value</li>
      <li>Professional installation by certified technicians</li>
    </ul>
  </div>
  <div style="background:#1a1a2e;color:#cccccc;padding:20px;text-align:center;font-size:12px;">
    <div style="font-weight:bold;color:#ffffff;">Done For You Pros</div>
    <p>Our 20 Connection New Parts Installations Program<br>is already Protecting 300,000+ Home Owners nationwide</p>
  </div>
</div>
</body>
</html>
"#
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EmailAddress;
    use rstest::rstest;

    fn notice(user_name: &str) -> WinnerNotice {
        WinnerNotice::try_from_parts(
            "jo@example.com",
            user_name,
            "Dishwasher New Water Valve Installation",
            "$591",
            "(310) 295-6355",
        )
        .expect("valid notice")
    }

    #[rstest]
    #[case("Tom & Jerry", "Tom &amp; Jerry")]
    #[case("<script>alert('x')</script>", "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;")]
    #[case("\"Quoted\"", "&quot;Quoted&quot;")]
    fn escapes_markup(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(escape_html(raw), expected);
    }

    #[rstest]
    fn body_carries_escaped_fields_and_dial_link() {
        let html = render(&notice("Jo <Lee>"));
        assert!(html.contains("Dear Jo &lt;Lee&gt;,"));
        assert!(!html.contains("<Lee>"));
        assert!(html.contains("href=\"tel:3102956355\""));
        assert!(html.contains("$591"));
    }

    #[rstest]
    fn subject_names_the_prize_value() {
        let notice = WinnerNotice::test_for(EmailAddress::new("jo@example.com").expect("email"));
        assert!(subject(&notice).contains("Claim Your $591 Prize"));
    }
}
