//! Route table for the `/api` scope.

use actix_web::web;

use super::{admin_registrations, auth, email, game, registrations, settings};

/// Register every `/api` handler.
///
/// Fixed prefixes (`auth`, `admin`, `email`, `game`) come before the
/// `/{slug}` routes; those words are reserved and never valid slugs.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::login)
        .service(auth::logout)
        .service(auth::me)
        .service(auth::update_credentials)
        .service(email::send_winner_email)
        .service(email::send_test_email)
        .service(game::game_layout)
        .service(game::evaluate_card)
        .service(registrations::register)
        .service(registrations::stats)
        .service(settings::public_setting)
        .service(settings::list_settings)
        .service(settings::put_setting)
        .service(admin_registrations::list_registrations)
        .service(admin_registrations::registration_summary)
        .service(admin_registrations::bulk_delete_registrations)
        .service(admin_registrations::delete_registration);
}
