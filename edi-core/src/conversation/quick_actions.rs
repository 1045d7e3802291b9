//! Quick actions offered next to the chat input

use super::{MessageKind, MessageSink};
use crate::locale::{language_name, LocaleCatalog, StringKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clinic {
    pub name: &'static str,
    pub address: &'static str,
    pub hours: &'static str,
    pub phone: &'static str,
}

pub const CLINICS: &[Clinic] = &[
    Clinic {
        name: "Johannesburg Central Clinic",
        address: "123 Health St, Johannesburg, 2000",
        hours: "Mon-Fri: 7:30AM-4PM, Sat: 8AM-12PM",
        phone: "011 123 4567",
    },
    Clinic {
        name: "Soweto Community Health Center",
        address: "456 Wellness Ave, Soweto, 1809",
        hours: "Mon-Fri: 8AM-5PM",
        phone: "011 987 6543",
    },
];

const AMBULANCE_NUMBER: &str = "10177";

impl Clinic {
    fn card(&self) -> String {
        format!(
            "{}\n  {}\n  Hours: {}\n  Phone: {}",
            self.name, self.address, self.hours, self.phone
        )
    }
}

/// Post the clinic intro followed by the clinic list
pub fn find_clinics(sink: &dyn MessageSink) {
    sink.post(
        "I can help you find nearby clinics. Please share your location or town name.",
        MessageKind::Receive,
    );

    let mut listing = String::from("Nearby Clinics:");
    for clinic in CLINICS {
        listing.push_str("\n\n");
        listing.push_str(&clinic.card());
    }
    listing.push_str("\n\nRemember to bring your ID and medical card if you have one.");
    sink.post(&listing, MessageKind::Receive);
}

/// First-aid steps while waiting for an ambulance
pub fn ambulance_instructions() -> &'static [&'static str] {
    &[
        "Stay calm and keep the patient still",
        "If unconscious, place in recovery position",
        "If bleeding, apply direct pressure with clean cloth",
        "Loosen tight clothing around neck and waist",
        "Do not give food or drink",
    ]
}

/// Post the urgent call notice followed by the waiting instructions
pub fn call_ambulance(sink: &dyn MessageSink) {
    sink.post(
        &format!(
            "URGENT: I've prepared emergency information for you. Please call {AMBULANCE_NUMBER} immediately for an ambulance."
        ),
        MessageKind::Receive,
    );

    let steps = ambulance_instructions()
        .iter()
        .map(|step| format!("- {step}"))
        .collect::<Vec<_>>()
        .join("\n");
    sink.post(
        &format!("While waiting for the ambulance:\n{steps}"),
        MessageKind::Receive,
    );
}

/// Post the language-switch notice in the new language
///
/// Unknown codes are announced by their code.
pub fn language_changed(catalog: &LocaleCatalog, code: &str, sink: &dyn MessageSink) {
    let name = language_name(code).unwrap_or(code);
    let text = catalog.format(code, StringKey::LanguageChanged, &[("language", name)]);
    sink.post(&text, MessageKind::Receive);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::recording::RecordingSink;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_find_clinics_posts_intro_then_listing() {
        let sink = RecordingSink::default();
        find_clinics(&sink);

        let texts = sink.texts();
        assert_eq!(texts.len(), 2);
        assert!(texts[0].starts_with("I can help you find nearby clinics."));
        assert!(texts[1].contains("Johannesburg Central Clinic"));
        assert!(texts[1].contains("011 987 6543"));
        assert!(texts[1].ends_with("medical card if you have one."));
    }

    #[test]
    fn test_call_ambulance_lists_all_steps() {
        let sink = RecordingSink::default();
        call_ambulance(&sink);

        let texts = sink.texts();
        assert_eq!(texts.len(), 2);
        assert!(texts[0].contains("call 10177 immediately"));
        for step in ambulance_instructions() {
            assert!(texts[1].contains(step));
        }
        assert!(sink
            .posted()
            .iter()
            .all(|(kind, _)| *kind == MessageKind::Receive));
    }

    #[test]
    fn test_language_changed_uses_display_name() {
        let catalog = LocaleCatalog::builtin().unwrap();
        let sink = RecordingSink::default();
        language_changed(&catalog, "nso", &sink);
        assert_eq!(sink.texts(), vec!["Language changed to Sepedi (Northern Sotho)"]);
    }
}
