//! Help centre content

use serde::Serialize;

use super::result::{Error, Result};

#[derive(Debug, Clone, Serialize)]
pub struct Faq {
    pub question: &'static str,
    pub answer: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactChannel {
    pub title: &'static str,
    pub description: &'static str,
    pub action: &'static str,
}

pub const FAQS: &[Faq] = &[
    Faq {
        question: "How do I transfer money to another bank?",
        answer: "Run 'kobo transfer', pick the recipient's bank, enter the account number, \
                 amount and your transaction PIN to complete the transfer.",
    },
    Faq {
        question: "What are the transaction limits?",
        answer: "Daily transfer limit is ₦1,000,000 for Tier 2 accounts. For higher limits, \
                 upgrade to Tier 3 with additional verification.",
    },
    Faq {
        question: "How do I upgrade my account tier?",
        answer: "Visit any office with valid ID, proof of address, and BVN.",
    },
    Faq {
        question: "How do I block my card?",
        answer: "Run 'kobo cards block <id>'. You can also call our 24/7 hotline immediately.",
    },
    Faq {
        question: "What should I do if I forget my transaction PIN?",
        answer: "Run 'kobo pin clear' and then 'kobo pin set'. You will be asked for your \
                 account password first.",
    },
    Faq {
        question: "How do I download my bank statement?",
        answer: "Run 'kobo transactions export --out statement.csv'.",
    },
];

pub const CONTACT_CHANNELS: &[ContactChannel] = &[
    ContactChannel {
        title: "Call Us",
        description: "24/7 Customer Support",
        action: "+234 1 888 5832",
    },
    ContactChannel {
        title: "Email Support",
        description: "We reply within 24 hours",
        action: SUPPORT_EMAIL,
    },
    ContactChannel {
        title: "Live Chat",
        description: "Chat with our support team",
        action: "https://kobo.money/chat",
    },
];

/// Case-insensitive search over questions and answers
pub fn search_faqs(term: &str) -> Vec<&'static Faq> {
    let term = term.trim().to_lowercase();
    FAQS.iter()
        .filter(|f| {
            term.is_empty()
                || f.question.to_lowercase().contains(&term)
                || f.answer.to_lowercase().contains(&term)
        })
        .collect()
}

/// A message for the support team
///
/// There is no ticket endpoint; the CLI validates the form and hands it to
/// the e-mail channel.
#[derive(Debug, Clone, Serialize)]
pub struct SupportRequest {
    pub subject: String,
    pub message: String,
}

impl SupportRequest {
    pub fn new(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into().trim().to_string(),
            message: message.into().trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.subject.is_empty() || self.message.is_empty() {
            return Err(Error::validation("Please fill in all fields"));
        }
        Ok(())
    }

    /// `mailto:` link addressed to the e-mail support channel
    pub fn mailto(&self) -> String {
        let encode = |s: &str| url::form_urlencoded::byte_serialize(s.as_bytes()).collect::<String>();
        format!(
            "mailto:{}?subject={}&body={}",
            SUPPORT_EMAIL,
            encode(&self.subject).replace('+', "%20"),
            encode(&self.message).replace('+', "%20"),
        )
    }
}

pub const SUPPORT_EMAIL: &str = "help@kobo.money";
