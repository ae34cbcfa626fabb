use icalendar::{Calendar, Component, Event, EventLike};

use crate::models::{Item, ItemKind};

#[derive(Clone, Default)]
pub struct ICalExporter;

impl ICalExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, kind: ItemKind, items: &[&Item]) -> Vec<u8> {
        if items.is_empty() {
            return Vec::new();
        }

        let mut calendar = Calendar::new();
        calendar.name(&format!("USI {}s", kind.label()));

        for item in items {
            let mut event = Event::new();
            event.summary(&item.title);
            event.starts(item.start_date);
            event.ends(item.end_date);
            event.location(&item.mode);
            let mut description = format!("{}\nTime: {}", item.description, item.time);
            if !item.is_free() {
                description.push_str(&format!("\nPrice: ₹{}", item.price));
            }
            event.description(description.trim_start());
            event.uid(&format!(
                "{}-{}-usi-portal",
                kind.label().to_lowercase(),
                item.id
            ));
            calendar.push(event);
        }

        calendar.to_string().into_bytes()
    }
}
