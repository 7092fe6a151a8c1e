//! Message classification rules.
//!
//! A [`RuleSet`] is the flat rule configuration (usually loaded from
//! `email_rules.json`). A [`RuleEngine`] is the same rule set normalized for
//! matching, evaluating categories in a fixed precedence order:
//!
//! 1. VIP senders are marked important
//! 2. External recruitment mail is archived (by domain, or by subject
//!    keyword unless the sender is a whitelisted partner)
//! 3. Cancelled/declined meeting notices are archived
//! 4. Approval requests from system senders are flagged
//! 5. Whitelisted partners are kept
//! 6. Everything else is kept
//!
//! # Example
//!
//! ```
//! use mailtriage_core::{Action, Message, RuleSet, classify};
//!
//! let rules = RuleSet {
//!     vip_senders: vec!["ceo@example.com".to_string()],
//!     ..RuleSet::default()
//! };
//! let message = Message::new("1", "CEO@example.com", "Budget");
//!
//! let disposition = classify(&message, &rules);
//! assert_eq!(disposition.action, Action::MarkImportant);
//! assert_eq!(disposition.priority, 1);
//! ```

mod engine;
mod model;

pub use engine::{Action, Disposition, Rule, RuleEngine, classify};
pub use model::RuleSet;
