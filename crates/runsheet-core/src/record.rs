// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Patient care report record — the immutable input to the layout engine.
//
// Every field is optional on the wire so partially completed records still
// deserialize; the "render nothing" rules live here as `is_blank` helpers and
// filtered iterators rather than in the section renderers.

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

/// True when a free-text field carries no visible content.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// A complete patient care report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportRecord {
    pub basic: BasicInfo,
    pub patient: PatientInfo,
    pub history: MedicalHistory,
    pub assessment: Assessment,
    pub pain: PainAssessment,
    /// Absent when no oxygen was administered.
    pub oxygen: Option<OxygenTherapy>,
    pub spo2_readings: Vec<TimedReading>,
    pub transport: Transport,
    pub crew: Vec<CrewMember>,
    /// Serialized output of the annotation (body diagram) surface.
    pub annotation: Option<String>,
}

impl ReportRecord {
    /// Check the minimal subset of fields a printable report needs.
    ///
    /// Returns every missing field at once so the operator can fix them in
    /// one pass.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("date", &self.basic.date),
            ("patient name", &self.patient.name),
            ("incident number", &self.basic.incident_number),
            ("unit number", &self.basic.unit_number),
        ];

        let missing: Vec<String> = required
            .iter()
            .filter(|(_, value)| is_blank(value))
            .map(|(name, _)| (*name).to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ReportError::MissingRequiredFields(missing))
        }
    }

    /// SpO2 readings with at least one non-blank column.
    pub fn recorded_spo2(&self) -> impl Iterator<Item = &TimedReading> {
        self.spo2_readings.iter().filter(|r| !r.is_blank())
    }
}

// -- Basic information ---------------------------------------------------------

/// Dispatch category of the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CallType {
    #[default]
    Emergency,
    Urgent,
    NonUrgent,
    Transfer,
    Standby,
}

impl CallType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Emergency => "Emergency",
            Self::Urgent => "Urgent",
            Self::NonUrgent => "Non-urgent",
            Self::Transfer => "Inter-facility transfer",
            Self::Standby => "Standby",
        }
    }
}

/// Incident identifiers and the call timeline ("HH:MM" strings).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BasicInfo {
    pub date: String,
    pub incident_number: String,
    pub unit_number: String,
    pub call_type: CallType,
    pub location: String,
    pub call_received: String,
    pub dispatched: String,
    pub en_route: String,
    pub on_scene: String,
    pub departed_scene: String,
    pub at_destination: String,
    pub in_service: String,
}

// -- Patient -------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
    Other,
    #[default]
    Unknown,
}

impl Sex {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PatientInfo {
    pub name: String,
    pub age: String,
    pub sex: Sex,
    pub date_of_birth: String,
    pub address: String,
    pub phone: String,
    pub weight_kg: String,
    /// Hospital or national identifier, if known.
    pub identifier: String,
}

// -- History -------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MedicalHistory {
    pub chief_complaint: String,
    pub history: String,
    pub medications: String,
    pub allergies: String,
    pub last_oral_intake: String,
    pub events_leading: String,
}

// -- Assessment ----------------------------------------------------------------

/// AVPU level of consciousness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Consciousness {
    Alert,
    Voice,
    Pain,
    Unresponsive,
}

impl Consciousness {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Alert => "Alert",
            Self::Voice => "Responds to voice",
            Self::Pain => "Responds to pain",
            Self::Unresponsive => "Unresponsive",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Assessment {
    pub consciousness: Option<Consciousness>,
    pub gcs_eye: String,
    pub gcs_verbal: String,
    pub gcs_motor: String,
    pub skin: String,
    pub pupils: String,
    pub primary_impression: String,
    pub treatment: String,
    pub narrative: String,
    pub vital_signs: Vec<VitalSigns>,
}

impl Assessment {
    /// Vital-sign rows with at least one non-blank column.
    pub fn recorded_vitals(&self) -> impl Iterator<Item = &VitalSigns> {
        self.vital_signs.iter().filter(|v| !v.is_blank())
    }

    /// "E4 V5 M6 = 15" style summary, or empty when nothing was scored.
    pub fn gcs_summary(&self) -> String {
        let parts = [
            ("E", &self.gcs_eye, 4),
            ("V", &self.gcs_verbal, 5),
            ("M", &self.gcs_motor, 6),
        ];
        if parts.iter().all(|(_, v, _)| is_blank(v)) {
            return String::new();
        }

        let scored: Vec<String> = parts
            .iter()
            .map(|(k, v, _)| format!("{k}{}", v.trim()))
            .collect();
        // Totals only when every component is a valid score.
        let total = parts.iter().try_fold(0u8, |sum, (_, v, max)| {
            v.trim()
                .parse::<u8>()
                .ok()
                .filter(|score| (1..=*max).contains(score))
                .map(|score| sum + score)
        });
        match total {
            Some(total) => format!("{} = {total}", scored.join(" ")),
            None => scored.join(" "),
        }
    }
}

/// One row of the vital-signs time series.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VitalSigns {
    pub time: String,
    pub blood_pressure: String,
    pub pulse: String,
    pub respiration: String,
    pub spo2: String,
    pub temperature: String,
    pub glucose: String,
    pub gcs: String,
    pub notes: String,
}

impl VitalSigns {
    /// Column values in table order.
    pub fn columns(&self) -> [&str; 9] {
        [
            &self.time,
            &self.blood_pressure,
            &self.pulse,
            &self.respiration,
            &self.spo2,
            &self.temperature,
            &self.glucose,
            &self.gcs,
            &self.notes,
        ]
    }

    pub fn is_blank(&self) -> bool {
        self.columns().iter().all(|c| is_blank(c))
    }
}

// -- Pain ----------------------------------------------------------------------

/// OPQRST pain assessment, printed beside the body diagram.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PainAssessment {
    pub location: String,
    pub onset: String,
    pub provocation: String,
    pub quality: String,
    pub radiation: String,
    /// 0–10 numeric rating.
    pub severity: Option<u8>,
    pub time: String,
}

impl PainAssessment {
    pub fn severity_label(&self) -> String {
        match self.severity {
            Some(score) => format!("{} / 10", score.min(10)),
            None => String::new(),
        }
    }
}

// -- Oxygen --------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OxygenTherapy {
    pub indication: String,
    pub delivery_device: String,
    pub initial_flow_rate: String,
    pub start_time: String,
    pub end_time: String,
    pub flow_changes: Vec<FlowChange>,
    pub notes: String,
}

impl OxygenTherapy {
    /// Flow-rate alterations with at least one non-blank column.
    pub fn recorded_changes(&self) -> impl Iterator<Item = &FlowChange> {
        self.flow_changes.iter().filter(|c| !c.is_blank())
    }
}

/// A flow-rate alteration during oxygen therapy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlowChange {
    pub time: String,
    pub rate: String,
}

impl FlowChange {
    pub fn is_blank(&self) -> bool {
        is_blank(&self.time) && is_blank(&self.rate)
    }
}

/// A single time-indexed measurement (SpO2 readings).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimedReading {
    pub time: String,
    pub value: String,
}

impl TimedReading {
    pub fn is_blank(&self) -> bool {
        is_blank(&self.time) && is_blank(&self.value)
    }
}

// -- Transport -----------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Disposition {
    #[default]
    Transported,
    TreatedAndReleased,
    Refused,
    DeadOnScene,
    Cancelled,
}

impl Disposition {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Transported => "Transported",
            Self::TreatedAndReleased => "Treated and released",
            Self::Refused => "Refused care",
            Self::DeadOnScene => "Dead on scene",
            Self::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransportMode {
    Emergent,
    #[default]
    NonEmergent,
}

impl TransportMode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Emergent => "Emergent (lights/siren)",
            Self::NonEmergent => "Non-emergent",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Transport {
    pub disposition: Disposition,
    pub destination: String,
    pub mode: TransportMode,
    pub receiving_staff: String,
    pub transfer_time: String,
    pub handover_notes: String,
}

// -- Crew ----------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CrewMember {
    pub name: String,
    pub role: String,
    pub certification: String,
}
