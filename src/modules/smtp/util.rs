use rand::Rng;

use crate::modules::utils::email_domain;
use crate::utc_now;

/// Builds a Message-ID (without angle brackets) scoped to the sender's domain.
pub fn generate_message_id(sender: &str) -> String {
    let random_bytes: [u8; 16] = rand::rng().random();
    let random_id = hex::encode(random_bytes);
    let domain = email_domain(sender).unwrap_or("draftmailer.local");
    format!("{}.{}@{}", utc_now!(), random_id, domain)
}
