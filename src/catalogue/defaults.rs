//! Built-in catalogue used when no configuration is supplied

use once_cell::sync::Lazy;
use std::sync::Arc;

use super::config::{AttributeConfig, CatalogueConfig, ValueConfig};
use super::kind::ValueKind;
use super::Catalogue;

static DEFAULT_CATALOGUE: Lazy<Arc<Catalogue>> =
    Lazy::new(|| Arc::new(Catalogue::build(&default_config())));

/// Shared handle to the built-in catalogue
pub fn default_catalogue() -> Arc<Catalogue> {
    Arc::clone(&DEFAULT_CATALOGUE)
}

/// Configuration of the built-in catalogue
pub fn default_config() -> CatalogueConfig {
    use ValueKind::{AgeRange, DrillDown, Number, Text};

    let channel_fields = || {
        vec![
            ValueConfig::new("Date & Time", Text),
            ValueConfig::new("Content", Text),
            ValueConfig::new("Status", Text),
        ]
    };

    let mut config = CatalogueConfig {
        attributes: vec![
            AttributeConfig::new("Appointment", DrillDown).with_values(vec![
                ValueConfig::new("Appointment Date", Text),
                ValueConfig::new("Appointment ID", Number),
                ValueConfig::new("Date & Time", Text),
                ValueConfig::new("Doctor Name", Text),
                ValueConfig::new("Call Type", Text),
            ]),
            AttributeConfig::new("Communication", DrillDown).with_values(vec![
                ValueConfig::new("Whatsapp", DrillDown),
                ValueConfig::new("SMS", DrillDown),
                ValueConfig::new("Email", DrillDown),
            ]),
            AttributeConfig::new("Status", Text),
            AttributeConfig::new("Profile holder age", AgeRange),
        ],
        ..Default::default()
    };

    let communication = config.sub_lists.entry("Communication".to_string()).or_default();
    for channel in ["Whatsapp", "SMS", "Email"] {
        communication.insert(channel.to_string(), channel_fields());
    }

    config
}
