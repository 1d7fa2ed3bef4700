//! Scratch card layout and win rule.
//!
//! The win condition is data: a [`WinRule`] counts matching prize ids on a
//! card's cells, so prize labels and values can change without touching the
//! evaluation code.

use std::collections::{HashMap, HashSet};
use std::fmt;

/// Identifier of a prize in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrizeId(String);

impl PrizeId {
    /// Wrap an identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

impl AsRef<str> for PrizeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrizeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One prize that can appear under a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prize {
    /// Catalogue identifier.
    pub id: PrizeId,
    /// Text shown under the scratch layer.
    pub label: String,
    /// Advertised value in whole US dollars.
    pub value_usd: u32,
}

/// A scratch card: an ordered grid of prize references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchCard {
    /// Card number shown to the player.
    pub id: u8,
    /// Prize under each cell, row-major.
    pub cells: Vec<PrizeId>,
}

/// Win condition applied to a fully revealed card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WinRule {
    /// Win when one prize id shows up on at least `count` cells. With
    /// `prize` set only that id counts.
    MatchAtLeast {
        /// Restrict matching to this prize.
        prize: Option<PrizeId>,
        /// Minimum number of matching cells.
        count: usize,
    },
}

/// Result of evaluating a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Some cells are still covered.
    Incomplete,
    /// Fully revealed without a win.
    Lose,
    /// Fully revealed and the rule matched.
    Win {
        /// Matched prize.
        prize: Prize,
        /// Number of cells showing it.
        matches: usize,
        /// `value_usd * matches`.
        total_value_usd: u32,
    },
}

/// Problems with a layout definition or an evaluation request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// The layout has no cards.
    #[error("game layout must contain at least one card")]
    NoCards,
    /// Two cards share an id.
    #[error("card {0} is defined more than once")]
    DuplicateCard(u8),
    /// A card has no cells.
    #[error("card {0} has no cells")]
    EmptyCard(u8),
    /// A cell or the rule references a prize missing from the catalogue.
    #[error("prize '{0}' is not in the catalogue")]
    UnknownPrize(PrizeId),
    /// The rule can never or always match.
    #[error("win rule count must be between 2 and {max}, got {count}")]
    InvalidRuleCount {
        /// Configured count.
        count: usize,
        /// Smallest card size.
        max: usize,
    },
    /// No card has the requested id.
    #[error("card {0} does not exist")]
    UnknownCard(u8),
    /// The reveal mask does not cover the card.
    #[error("card {card} has {expected} cells but {actual} were reported")]
    RevealMismatch {
        /// Card id.
        card: u8,
        /// Cells on the card.
        expected: usize,
        /// Entries in the mask.
        actual: usize,
    },
}

/// Validated prize catalogue, cards and rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameLayout {
    prizes: Vec<Prize>,
    cards: Vec<ScratchCard>,
    rule: WinRule,
}

impl GameLayout {
    /// Validate and assemble a layout.
    ///
    /// # Errors
    /// Returns a [`GameError`] for empty or duplicate cards, unknown prize
    /// references, or a rule count outside `2..=smallest card`.
    pub fn new(
        prizes: Vec<Prize>,
        cards: Vec<ScratchCard>,
        rule: WinRule,
    ) -> Result<Self, GameError> {
        let known: HashSet<&PrizeId> = prizes.iter().map(|prize| &prize.id).collect();
        let mut seen_cards = HashSet::new();
        for card in &cards {
            if !seen_cards.insert(card.id) {
                return Err(GameError::DuplicateCard(card.id));
            }
            if card.cells.is_empty() {
                return Err(GameError::EmptyCard(card.id));
            }
            if let Some(unknown) = card.cells.iter().find(|cell| !known.contains(cell)) {
                return Err(GameError::UnknownPrize(unknown.clone()));
            }
        }
        let smallest = cards
            .iter()
            .map(|card| card.cells.len())
            .min()
            .ok_or(GameError::NoCards)?;
        let WinRule::MatchAtLeast { prize, count } = &rule;
        if let Some(prize) = prize.as_ref().filter(|prize| !known.contains(prize)) {
            return Err(GameError::UnknownPrize(prize.clone()));
        }
        if *count < 2 || *count > smallest {
            return Err(GameError::InvalidRuleCount {
                count: *count,
                max: smallest,
            });
        }
        Ok(Self {
            prizes,
            cards,
            rule,
        })
    }

    /// Prize catalogue.
    #[must_use]
    pub fn prizes(&self) -> &[Prize] {
        &self.prizes
    }

    /// Cards in display order.
    #[must_use]
    pub fn cards(&self) -> &[ScratchCard] {
        &self.cards
    }

    /// Active win rule.
    #[must_use]
    pub fn rule(&self) -> &WinRule {
        &self.rule
    }

    /// Evaluate `card_id` given which of its cells are revealed.
    ///
    /// # Errors
    /// [`GameError::UnknownCard`] or [`GameError::RevealMismatch`].
    pub fn evaluate(&self, card_id: u8, revealed: &[bool]) -> Result<Outcome, GameError> {
        let card = self
            .cards
            .iter()
            .find(|card| card.id == card_id)
            .ok_or(GameError::UnknownCard(card_id))?;
        if revealed.len() != card.cells.len() {
            return Err(GameError::RevealMismatch {
                card: card_id,
                expected: card.cells.len(),
                actual: revealed.len(),
            });
        }
        if !revealed.iter().all(|cell| *cell) {
            return Ok(Outcome::Incomplete);
        }
        Ok(self.best_match(card).map_or(Outcome::Lose, |(prize, matches)| {
            let multiplier = u32::try_from(matches).unwrap_or(u32::MAX);
            Outcome::Win {
                total_value_usd: prize.value_usd.saturating_mul(multiplier),
                prize: prize.clone(),
                matches,
            }
        }))
    }

    fn best_match(&self, card: &ScratchCard) -> Option<(&Prize, usize)> {
        let WinRule::MatchAtLeast { prize, count } = &self.rule;
        let mut tally: HashMap<&PrizeId, usize> = HashMap::new();
        for cell in card
            .cells
            .iter()
            .filter(|cell| prize.as_ref().is_none_or(|wanted| wanted == *cell))
        {
            *tally.entry(cell).or_default() += 1;
        }
        tally
            .into_iter()
            .filter(|(_, matches)| matches >= count)
            .max_by(|(a_id, a), (b_id, b)| a.cmp(b).then_with(|| b_id.cmp(a_id)))
            .and_then(|(id, matches)| {
                self.prizes
                    .iter()
                    .find(|prize| &prize.id == id)
                    .map(|prize| (prize, matches))
            })
    }

    /// The two-card layout the campaign launched with: card 1 loses, card 2
    /// shows the dishwasher valve prize three times.
    ///
    /// # Errors
    /// Never in practice; the constant data satisfies every layout rule.
    pub fn launch_default() -> Result<Self, GameError> {
        const CATALOGUE: [(&str, &str, u32); 12] = [
            ("fridge-water-line", "Free Standing Refrigerator New Water Line Installation", 197),
            ("bath-sink-hot-valve", "Master Bathroom Sink New Hot Water Valve & Line Installation", 397),
            ("washer-water-lines", "Washer New Hot & Cold Water Lines Installation", 247),
            ("dishwasher-water-valve", "Dishwasher New Water Valve Installation", 197),
            ("kitchen-sink-hot-valve", "Kitchen Sink New Hot Water Valve & Line Installation", 397),
            ("cooktop-gas-line", "Cooktop, Range, or Stove New Gas Line Installation", 197),
            ("disposal-drain-hose", "Garbage Disposal New Drain Hose Installation", 147),
            ("dishwasher-air-cap", "Dishwasher New Air Cap Installation", 197),
            ("bath-sink-cold-valve", "Master Bathroom Sink New Cold Water Valve & Line Installation", 397),
            ("gas-dryer-line", "Gas Dryer New Gas Line Installation", 247),
            ("microwave-hood-venting", "Over The Range Microwave & Hood Venting Retaped Pro Style", 147),
            ("kitchen-sink-cold-valve", "Kitchen Sink New Cold Water Valve & Line Installation", 397),
        ];
        const CARD_ONE: [&str; 9] = [
            "fridge-water-line",
            "bath-sink-hot-valve",
            "washer-water-lines",
            "dishwasher-water-valve",
            "kitchen-sink-hot-valve",
            "cooktop-gas-line",
            "disposal-drain-hose",
            "dishwasher-air-cap",
            "bath-sink-cold-valve",
        ];
        const CARD_TWO: [&str; 9] = [
            "gas-dryer-line",
            "dishwasher-water-valve",
            "dishwasher-water-valve",
            "bath-sink-hot-valve",
            "microwave-hood-venting",
            "dishwasher-water-valve",
            "kitchen-sink-cold-valve",
            "washer-water-lines",
            "fridge-water-line",
        ];

        let prizes = CATALOGUE
            .into_iter()
            .map(|(id, label, value_usd)| Prize {
                id: PrizeId::new(id),
                label: label.to_owned(),
                value_usd,
            })
            .collect();
        let card = |id: u8, cells: [&str; 9]| ScratchCard {
            id,
            cells: cells.into_iter().map(PrizeId::new).collect(),
        };
        Self::new(
            prizes,
            vec![card(1, CARD_ONE), card(2, CARD_TWO)],
            WinRule::MatchAtLeast {
                prize: Some(PrizeId::new("dishwasher-water-valve")),
                count: 3,
            },
        )
    }
}
