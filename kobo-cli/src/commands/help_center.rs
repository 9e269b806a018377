//! Help centre - FAQs and contacting support

use anyhow::Result;
use colored::Colorize;
use kobo_core::domain::support::{search_faqs, SupportRequest, CONTACT_CHANNELS};

use super::value_or_prompt;
use crate::output;

pub fn run(search: Option<String>, contact: bool, json: bool) -> Result<()> {
    if contact {
        return contact_support(json);
    }

    let faqs = search_faqs(search.as_deref().unwrap_or(""));
    if json {
        return output::json(serde_json::json!({
            "faqs": faqs,
            "contact": CONTACT_CHANNELS,
        }));
    }

    if faqs.is_empty() {
        println!("No answers match your search. Try 'kobo help-center --contact'.");
    }
    for faq in &faqs {
        println!("{}", faq.question.bold());
        println!("  {}", faq.answer);
        println!();
    }

    println!("{}", "Still need help?".bold());
    for channel in CONTACT_CHANNELS {
        println!(
            "  {:<14} {}  {}",
            channel.title,
            channel.action.cyan(),
            channel.description.dimmed()
        );
    }
    Ok(())
}

fn contact_support(json: bool) -> Result<()> {
    let request = SupportRequest::new(
        value_or_prompt(None, "Subject")?,
        value_or_prompt(None, "Message")?,
    );
    request.validate()?;

    let link = request.mailto();
    if json {
        return output::json(serde_json::json!({
            "subject": request.subject,
            "message": request.message,
            "mailto": link,
        }));
    }
    output::success("Your message is ready. Open this link to send it:");
    println!("  {}", link);
    Ok(())
}
