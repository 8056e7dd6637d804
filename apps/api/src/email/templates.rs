//! Builders for the three transactional messages: welcome on registration,
//! contact-form relay, and portfolio-share notification.

use uuid::Uuid;

use crate::email::TemplateParams;

/// Public URL of a user's portfolio page, embedded in outgoing mail.
pub fn portfolio_url(base_url: &str, user_id: Uuid) -> String {
    format!("{}/portfolio?userid={user_id}", base_url.trim_end_matches('/'))
}

pub fn welcome_email(
    base_url: &str,
    user_id: Uuid,
    email: &str,
    display_name: &str,
) -> TemplateParams {
    let link = portfolio_url(base_url, user_id);
    let body = format!(
        "Hello {display_name},\n\n\
         Welcome aboard! Your account has been created.\n\n\
         User ID: {user_id}\n\
         Portfolio link: {link}\n\n\
         You can now edit your portfolio, upload a profile image and resume, \
         and share your page using the link above.\n\n\
         Best regards,\nPortfolio Team\n\n\
         ---\nThis is an automated message. Please do not reply to this email."
    );

    TemplateParams::new()
        .set("to_email", email)
        .set("to_name", display_name)
        .set("user_id", user_id.to_string())
        .set("portfolio_link", link)
        .set("subject", format!("Welcome to Portfolio Platform - {display_name}"))
        .set("message", body)
        .set("from_name", "Portfolio Team")
}

pub fn contact_email(
    owner_email: &str,
    name: &str,
    reply_to: &str,
    subject: &str,
    message: &str,
) -> TemplateParams {
    let body = format!(
        "New message from portfolio contact form:\n\n\
         Name: {name}\n\
         Email: {reply_to}\n\
         Subject: {subject}\n\n\
         Message:\n{message}\n\n\
         ---\nReply directly to this email to respond to {name}."
    );

    TemplateParams::new()
        .set("to_email", owner_email)
        .set("from_name", name)
        .set("from_email", reply_to)
        .set("reply_to", reply_to)
        .set("subject", format!("Portfolio Contact: {subject}"))
        .set("message", body)
}

pub fn share_email(
    base_url: &str,
    sender_name: &str,
    recipient_email: &str,
    recipient_name: &str,
    user_id: Uuid,
) -> TemplateParams {
    let link = portfolio_url(base_url, user_id);
    let greeting = if recipient_name.is_empty() {
        "Friend"
    } else {
        recipient_name
    };
    let body = format!(
        "Hello {greeting},\n\n\
         {sender_name} has shared their portfolio with you!\n\n\
         Portfolio link: {link}\n\n\
         Take a look at their work and connect with them if you're interested \
         in collaborating.\n\n\
         Best regards,\nPortfolio Team"
    );

    TemplateParams::new()
        .set("to_email", recipient_email)
        .set("to_name", greeting)
        .set("portfolio_link", link)
        .set("subject", format!("{sender_name} shared their portfolio with you"))
        .set("message", body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portfolio_url_shape() {
        let id = Uuid::nil();
        assert_eq!(
            portfolio_url("https://folio.example.com/", id),
            format!("https://folio.example.com/portfolio?userid={id}")
        );
    }

    #[test]
    fn test_welcome_email_carries_link_and_subject() {
        let id = Uuid::new_v4();
        let params = welcome_email("https://folio.example.com", id, "jane@example.com", "Jane");
        assert_eq!(params.get("to_email"), Some("jane@example.com"));
        assert!(params.get("subject").unwrap().contains("Jane"));
        assert!(params
            .get("message")
            .unwrap()
            .contains(&format!("userid={id}")));
    }

    #[test]
    fn test_contact_email_sets_reply_to_sender() {
        let params = contact_email(
            "owner@example.com",
            "Sam",
            "sam@example.com",
            "Collaboration",
            "Love your work.",
        );
        assert_eq!(params.get("to_email"), Some("owner@example.com"));
        assert_eq!(params.get("reply_to"), Some("sam@example.com"));
        assert_eq!(
            params.get("subject"),
            Some("Portfolio Contact: Collaboration")
        );
        assert!(params.get("message").unwrap().contains("Love your work."));
    }

    #[test]
    fn test_share_email_defaults_recipient_name() {
        let params = share_email(
            "https://folio.example.com",
            "Jane",
            "friend@example.com",
            "",
            Uuid::new_v4(),
        );
        assert!(params.get("message").unwrap().contains("Hello Friend"));
    }
}
