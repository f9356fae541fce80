use chrono::{DateTime, Utc};
use tera::{Context, Tera};

/// User-facing confirmation and error messages, rendered from templates so
/// the excluded API layer can later swap in localized catalogs.
pub struct Messages {
    tera: Tera,
}

const TEMPLATES: [(&str, &str); 6] = [
    ("tenant_activated", "Tenant {{ id }} is now activated."),
    ("tenant_deactivated", "Tenant {{ id }} is now deactivated."),
    ("tenant_already_active", "Tenant {{ id }} is already activated."),
    ("tenant_already_inactive", "Tenant {{ id }} is already deactivated."),
    (
        "subscription_extended",
        "Tenant {{ id }}'s subscription upgraded. Now valid until {{ valid_until }}.",
    ),
    ("tenant_not_found", "Tenant {{ id }} not found."),
];

impl Messages {
    pub fn new() -> Self {
        let mut tera = Tera::default();
        for (name, body) in TEMPLATES {
            tera.add_raw_template(name, body)
                .expect("Failed to load message template");
        }
        Self { tera }
    }

    pub fn tenant_activated(&self, id: &str) -> String {
        self.render_with_id("tenant_activated", id)
    }

    pub fn tenant_deactivated(&self, id: &str) -> String {
        self.render_with_id("tenant_deactivated", id)
    }

    pub fn tenant_already_active(&self, id: &str) -> String {
        self.render_with_id("tenant_already_active", id)
    }

    pub fn tenant_already_inactive(&self, id: &str) -> String {
        self.render_with_id("tenant_already_inactive", id)
    }

    pub fn tenant_not_found(&self, id: &str) -> String {
        self.render_with_id("tenant_not_found", id)
    }

    pub fn subscription_extended(&self, id: &str, valid_until: DateTime<Utc>) -> String {
        let mut ctx = Context::new();
        ctx.insert("id", id);
        ctx.insert(
            "valid_until",
            &valid_until.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        );
        self.render("subscription_extended", &ctx)
    }

    fn render_with_id(&self, name: &str, id: &str) -> String {
        let mut ctx = Context::new();
        ctx.insert("id", id);
        self.render(name, &ctx)
    }

    fn render(&self, name: &str, ctx: &Context) -> String {
        self.tera.render(name, ctx).unwrap_or_else(|_| name.to_string())
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_messages_render_with_arguments() {
        let messages = Messages::new();
        assert_eq!(
            messages.tenant_activated("acme"),
            "Tenant acme is now activated."
        );
        assert_eq!(
            messages.tenant_not_found("ghost"),
            "Tenant ghost not found."
        );

        let expiry = Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap();
        let msg = messages.subscription_extended("acme", expiry);
        assert!(msg.contains("acme"), "message should name the tenant: {msg}");
        assert!(msg.contains("2027-01-01"), "message should carry the expiry: {msg}");
    }
}
