//! Body-region symptom selection
//!
//! The view state of the body map (rotation, front/back, highlighted regions)
//! plus the per-region symptom checklist sent to `/analyze_body_region`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::client::{RegionAnalysis, RegionRequest, SessionId, TriageBackend};
use crate::conversation::{MessageKind, MessageSink};
use crate::error::{EdiError, Result};
use crate::locale::{LocaleCatalog, StringKey};

/// Radians per rotate step
pub const ROTATION_STEP: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyRegion {
    Head,
    Chest,
    Abdomen,
    Arms,
    Legs,
    Back,
}

impl BodyRegion {
    pub const ALL: [BodyRegion; 6] = [
        BodyRegion::Head,
        BodyRegion::Chest,
        BodyRegion::Abdomen,
        BodyRegion::Arms,
        BodyRegion::Legs,
        BodyRegion::Back,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyRegion::Head => "head",
            BodyRegion::Chest => "chest",
            BodyRegion::Abdomen => "abdomen",
            BodyRegion::Arms => "arms",
            BodyRegion::Legs => "legs",
            BodyRegion::Back => "back",
        }
    }

    /// Symptoms offered for the region, in display order
    pub fn symptoms(&self) -> &'static [&'static str] {
        match self {
            BodyRegion::Head => &["Headache", "Dizziness", "Vision problems", "Ear pain", "Fever"],
            BodyRegion::Chest => &["Chest pain", "Shortness of breath", "Cough", "Palpitations"],
            BodyRegion::Abdomen => &["Stomach pain", "Nausea", "Vomiting", "Bloating", "Diarrhea"],
            BodyRegion::Arms => &["Arm pain", "Weakness", "Numbness", "Swelling", "Tingling"],
            BodyRegion::Legs => &["Leg pain", "Cramping", "Swelling", "Weakness", "Numbness"],
            BodyRegion::Back => &["Back pain", "Stiffness", "Shooting pain", "Numbness"],
        }
    }
}

impl fmt::Display for BodyRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BodyRegion {
    type Err = EdiError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        BodyRegion::ALL
            .into_iter()
            .find(|region| region.as_str() == wanted)
            .ok_or_else(|| {
                EdiError::Validation(format!(
                    "unknown body region '{s}' (expected one of: head, chest, abdomen, arms, legs, back)"
                ))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Left,
    Right,
}

/// View state of the body map
#[derive(Debug, Clone, PartialEq)]
pub struct BodyMap {
    rotation: f64,
    front_view: bool,
    selected: BTreeSet<BodyRegion>,
}

impl Default for BodyMap {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            front_view: true,
            selected: BTreeSet::new(),
        }
    }
}

impl BodyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn is_front_view(&self) -> bool {
        self.front_view
    }

    pub fn rotate(&mut self, direction: Rotation) {
        match direction {
            Rotation::Left => self.rotation -= ROTATION_STEP,
            Rotation::Right => self.rotation += ROTATION_STEP,
        }
    }

    /// Flip between front and back; snaps rotation to 0 or π
    pub fn toggle_view(&mut self) {
        self.front_view = !self.front_view;
        self.rotation = if self.front_view { 0.0 } else { PI };
    }

    pub fn reset(&mut self) {
        self.rotation = 0.0;
        self.selected.clear();
    }

    /// Flip the region's highlight; returns whether it is now selected
    pub fn toggle_region(&mut self, region: BodyRegion) -> bool {
        if self.selected.remove(&region) {
            false
        } else {
            self.selected.insert(region);
            true
        }
    }

    pub fn is_selected(&self, region: BodyRegion) -> bool {
        self.selected.contains(&region)
    }

    pub fn selected_regions(&self) -> impl Iterator<Item = BodyRegion> + '_ {
        self.selected.iter().copied()
    }
}

/// Symptom checklist for one region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSymptomForm {
    region: BodyRegion,
    /// Indices into `region.symptoms()`
    checked: BTreeSet<usize>,
}

impl RegionSymptomForm {
    pub fn new(region: BodyRegion) -> Self {
        Self {
            region,
            checked: BTreeSet::new(),
        }
    }

    pub fn region(&self) -> BodyRegion {
        self.region
    }

    /// Flip a symptom; returns whether it is now checked
    ///
    /// Matching is case-insensitive. Symptoms not listed for the region are
    /// rejected.
    pub fn toggle(&mut self, symptom: &str) -> Result<bool> {
        let index = self
            .region
            .symptoms()
            .iter()
            .position(|candidate| candidate.eq_ignore_ascii_case(symptom.trim()))
            .ok_or_else(|| {
                EdiError::Validation(format!(
                    "'{}' is not a {} symptom (expected one of: {})",
                    symptom,
                    self.region,
                    self.region.symptoms().join(", ")
                ))
            })?;

        if self.checked.remove(&index) {
            Ok(false)
        } else {
            self.checked.insert(index);
            Ok(true)
        }
    }

    /// Checked symptoms in display order
    pub fn checked(&self) -> Vec<String> {
        let symptoms = self.region.symptoms();
        self.checked
            .iter()
            .filter_map(|&index| symptoms.get(index).map(|s| s.to_string()))
            .collect()
    }

    /// Send the checked symptoms for analysis
    ///
    /// An empty checklist is rejected with the localized notice and nothing
    /// is sent. A successful analysis is posted to `sink` as a summary
    /// message; transport failures are returned for the caller to report.
    pub async fn submit(
        &self,
        backend: &dyn TriageBackend,
        session_id: &SessionId,
        catalog: &LocaleCatalog,
        lang: &str,
        sink: &dyn MessageSink,
    ) -> Result<RegionAnalysis> {
        let symptoms = self.checked();
        if symptoms.is_empty() {
            return Err(EdiError::Validation(
                catalog
                    .text(lang, StringKey::RegionSelectionRequired)
                    .to_string(),
            ));
        }

        debug!(
            "Analyzing {} symptoms for region {}",
            symptoms.len(),
            self.region
        );
        let analysis = backend
            .analyze_body_region(RegionRequest {
                region: self.region.as_str().to_string(),
                symptoms,
                session_id: session_id.clone(),
            })
            .await
            .map_err(|e| {
                warn!("Body region analysis failed: {}", e);
                EdiError::Backend(e)
            })?;

        if analysis.success {
            sink.post(&region_summary(self.region, &analysis), MessageKind::Receive);
        } else {
            debug!("Backend reported unsuccessful region analysis");
        }
        Ok(analysis)
    }
}

/// Chat message summarizing a region analysis
pub fn region_summary(region: BodyRegion, analysis: &RegionAnalysis) -> String {
    let urgency = if analysis.urgent {
        "HIGH - Seek immediate care"
    } else {
        "Moderate - Schedule clinic visit"
    };
    format!(
        "Analysis for {} symptoms:\nPossible conditions: {}\nUrgency: {}",
        region,
        analysis.possible_conditions.join(", "),
        urgency
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{BackendError, ScriptedBackend};
    use crate::conversation::recording::RecordingSink;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_region_parsing() {
        assert_eq!("Chest".parse::<BodyRegion>().unwrap(), BodyRegion::Chest);
        assert!("knee".parse::<BodyRegion>().is_err());
    }

    #[test]
    fn test_rotation_and_view() {
        let mut map = BodyMap::new();
        map.rotate(Rotation::Left);
        map.rotate(Rotation::Left);
        map.rotate(Rotation::Right);
        assert_eq!(map.rotation(), -0.5);

        map.toggle_view();
        assert!(!map.is_front_view());
        assert_eq!(map.rotation(), PI);

        map.toggle_view();
        assert_eq!(map.rotation(), 0.0);
    }

    #[test]
    fn test_toggle_region_and_reset() {
        let mut map = BodyMap::new();
        assert!(map.toggle_region(BodyRegion::Legs));
        assert!(map.toggle_region(BodyRegion::Head));
        assert!(!map.toggle_region(BodyRegion::Legs));
        assert_eq!(map.selected_regions().collect::<Vec<_>>(), vec![BodyRegion::Head]);

        map.rotate(Rotation::Right);
        map.reset();
        assert_eq!(map.rotation(), 0.0);
        assert_eq!(map.selected_regions().count(), 0);
    }

    #[test]
    fn test_form_keeps_display_order() {
        let mut form = RegionSymptomForm::new(BodyRegion::Abdomen);
        form.toggle("diarrhea").unwrap();
        form.toggle("Nausea").unwrap();
        assert_eq!(form.checked(), vec!["Nausea", "Diarrhea"]);
        assert!(!form.toggle("Nausea").unwrap());
        assert!(form.toggle("Chest pain").is_err());
    }

    #[tokio::test]
    async fn test_empty_form_is_not_sent() {
        let backend = ScriptedBackend::default();
        let sink = RecordingSink::default();
        let catalog = LocaleCatalog::builtin().unwrap();
        let form = RegionSymptomForm::new(BodyRegion::Back);

        let err = form
            .submit(&backend, &"s".into(), &catalog, "en", &sink)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Please select at least one symptom"
        );
        assert!(backend.recorded().is_empty());
        assert!(sink.posted().is_empty());
    }

    #[tokio::test]
    async fn test_successful_analysis_is_posted() {
        let backend = ScriptedBackend {
            region: Some(Ok(RegionAnalysis {
                success: true,
                possible_conditions: vec!["Migraine".to_string(), "Flu".to_string()],
                urgent: true,
                recommendation: "See a doctor".to_string(),
            })),
            ..Default::default()
        };
        let sink = RecordingSink::default();
        let catalog = LocaleCatalog::builtin().unwrap();
        let mut form = RegionSymptomForm::new(BodyRegion::Head);
        form.toggle("Fever").unwrap();

        let analysis = form
            .submit(&backend, &"session_x".into(), &catalog, "en", &sink)
            .await
            .unwrap();
        assert!(analysis.urgent);
        assert_eq!(
            sink.texts(),
            vec![
                "Analysis for head symptoms:\nPossible conditions: Migraine, Flu\nUrgency: HIGH - Seek immediate care"
            ]
        );
        assert_eq!(
            backend.recorded()[0],
            serde_json::json!({"region": "head", "symptoms": ["Fever"], "session_id": "session_x"})
        );
    }

    #[tokio::test]
    async fn test_transport_failure_is_returned() {
        let backend = ScriptedBackend {
            region: Some(Err(BackendError::Transport("refused".to_string()))),
            ..Default::default()
        };
        let sink = RecordingSink::default();
        let catalog = LocaleCatalog::builtin().unwrap();
        let mut form = RegionSymptomForm::new(BodyRegion::Legs);
        form.toggle("Cramping").unwrap();

        let err = form
            .submit(&backend, &"s".into(), &catalog, "en", &sink)
            .await
            .unwrap_err();
        assert!(matches!(err, EdiError::Backend(BackendError::Transport(_))));
        assert!(sink.posted().is_empty());
    }
}
