//! Host events that feed the site logs

use serde::{Deserialize, Serialize};

use crate::entry::{Fields, LogKind};

/// Events raised by the host that are worth logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiteEvent {
    /// A request resolved to no page
    NotFound {
        url: String,
        referrer: String,
        ip_address: String,
        user_agent: String,
    },

    /// An outgoing mail was handed to the mailer
    OutgoingMail {
        to: String,
        from: String,
        subject: String,
        message: String,
        headers: String,
    },

    /// A visitor ran a site search
    SearchPerformed {
        query: String,
        ip_address: String,
        user_agent: String,
    },
}

impl SiteEvent {
    /// The log this event is recorded in
    pub fn kind(&self) -> LogKind {
        match self {
            SiteEvent::NotFound { .. } => LogKind::not_found(),
            SiteEvent::OutgoingMail { .. } => LogKind::mail(),
            SiteEvent::SearchPerformed { .. } => LogKind::search(),
        }
    }

    /// Flatten the event into its attribute bag
    pub fn into_fields(self) -> Fields {
        let pairs: Vec<(&str, String)> = match self {
            SiteEvent::NotFound {
                url,
                referrer,
                ip_address,
                user_agent,
            } => vec![
                ("url", url),
                ("referrer", referrer),
                ("ip_address", ip_address),
                ("user_agent", user_agent),
            ],
            SiteEvent::OutgoingMail {
                to,
                from,
                subject,
                message,
                headers,
            } => vec![
                ("to", to),
                ("from", from),
                ("subject", subject),
                ("message", message),
                ("headers", headers),
            ],
            SiteEvent::SearchPerformed {
                query,
                ip_address,
                user_agent,
            } => vec![
                ("query", query),
                ("ip_address", ip_address),
                ("user_agent", user_agent),
            ],
        };

        pairs
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_fields() {
        let event = SiteEvent::NotFound {
            url: "/missing".into(),
            referrer: "https://example.com/".into(),
            ip_address: "203.0.113.7".into(),
            user_agent: "curl/8.0".into(),
        };
        assert_eq!(event.kind(), LogKind::not_found());

        let fields = event.into_fields();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields["url"], "/missing");
        assert_eq!(fields["ip_address"], "203.0.113.7");
    }

    #[test]
    fn test_mail_fields() {
        let event = SiteEvent::OutgoingMail {
            to: "a@example.com".into(),
            from: "site@example.com".into(),
            subject: "Hello".into(),
            message: "Body".into(),
            headers: "Content-Type: text/plain".into(),
        };
        assert_eq!(event.kind(), LogKind::mail());

        let fields = event.into_fields();
        assert_eq!(fields.len(), 5);
        assert_eq!(fields["subject"], "Hello");
    }

    #[test]
    fn test_search_fields() {
        let event = SiteEvent::SearchPerformed {
            query: "rust".into(),
            ip_address: "198.51.100.1".into(),
            user_agent: "Mozilla/5.0".into(),
        };
        assert_eq!(event.kind(), LogKind::search());
        assert_eq!(event.into_fields()["query"], "rust");
    }
}
