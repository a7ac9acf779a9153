//! Renders a consultation record into the instruction sent to the completion service.
//!
//! The output is a pure function of the record. Lines are indented by four
//! spaces and the whole prompt is trimmed, so the first line starts flush.

use vetdischarge_shared::{Consultation, ConsultationRecord, Patient};

const INDENT: &str = "    ";

const ROLE_INSTRUCTION: [&str; 2] = [
    "You are a veterinary assistant. Based on the following consultation data, ",
    "please generate empathetic and clear discharge notes for the pet's owner. ",
];

const PROCEDURES_HEADER: &str = "\nProcedures performed: \n";

const CLOSING_INSTRUCTION: &str = "\nPlease write the discharge note in plain language for the pet owner. \
Summarizing what was done and what to watch for or what to do next.\n";

/// Build the discharge-note prompt for `record`.
pub fn build_prompt(record: &ConsultationRecord) -> String {
    let mut prompt = String::new();

    for text in ROLE_INSTRUCTION {
        push_line(&mut prompt, text);
    }
    push_line(&mut prompt, "");
    push_patient(&mut prompt, &record.patient);
    push_line(&mut prompt, "");
    push_consultation(&mut prompt, &record.consultation);

    for note in &record.consultation.clinical_notes {
        prompt.push(' ');
        prompt.push_str(&note.note);
        prompt.push('\n');
    }

    // Header only, and only for a non-empty list: individual procedures are
    // never listed. Kept as-is pending a decision on the intended layout.
    if !record.consultation.treatment_items.procedures.is_empty() {
        prompt.push_str(PROCEDURES_HEADER);
    }

    prompt.push_str(CLOSING_INSTRUCTION);
    prompt.trim().to_string()
}

fn push_line(prompt: &mut String, text: &str) {
    prompt.push_str(INDENT);
    prompt.push_str(text);
    prompt.push('\n');
}

fn push_patient(prompt: &mut String, patient: &Patient) {
    push_line(prompt, "These are the patients details:");
    push_line(prompt, &format!("Name: {}", patient.name));
    push_line(prompt, &format!("Species: {}", patient.species));
    push_line(prompt, &format!("Breed: {}", patient.breed));
    push_line(prompt, &format!("Gender: {}", patient.gender));
    push_line(prompt, &format!("Neutered: {}", yes_no(patient.neutered)));
    push_line(prompt, &format!("Date of Birth: {}", patient.date_of_birth));
    push_line(prompt, &format!("Weight: {}", patient.weight));
}

fn push_consultation(prompt: &mut String, consultation: &Consultation) {
    push_line(
        prompt,
        &format!(
            "The Consultation is on {} at {}:",
            consultation.date, consultation.time
        ),
    );
    push_line(prompt, &format!("Reason: {}", consultation.reason));
    push_line(prompt, &format!("Type: {}", consultation.kind));
    push_line(prompt, "Clinical Notes:");
    // Notes follow on this indented line, each prefixed by a single space.
    prompt.push_str(INDENT);
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vetdischarge_shared::{ClinicalNote, Procedure, TreatmentItems};

    fn rex() -> ConsultationRecord {
        serde_json::from_str(
            r#"{"patient":{"name":"Rex","species":"Dog","breed":"Lab","gender":"M","neutered":true,"date_of_birth":"2020-01-01","weight":"30kg"},"consultation":{"date":"2024-01-01","time":"10:00","reason":"checkup","type":"routine","clinical notes":[{"note":"Healthy"}],"treatment_items":{"procedures":[]}}}"#,
        )
        .expect("parse rex")
    }

    fn procedure(name: &str) -> Procedure {
        Procedure {
            name: name.into(),
            date: "2024-01-01".into(),
            time: "10:30".into(),
        }
    }

    #[test]
    fn rex_prompt_exact_text() {
        let expected = concat!(
            "You are a veterinary assistant. Based on the following consultation data, \n",
            "    please generate empathetic and clear discharge notes for the pet's owner. \n",
            "    \n",
            "    These are the patients details:\n",
            "    Name: Rex\n",
            "    Species: Dog\n",
            "    Breed: Lab\n",
            "    Gender: M\n",
            "    Neutered: Yes\n",
            "    Date of Birth: 2020-01-01\n",
            "    Weight: 30kg\n",
            "    \n",
            "    The Consultation is on 2024-01-01 at 10:00:\n",
            "    Reason: checkup\n",
            "    Type: routine\n",
            "    Clinical Notes:\n",
            "     Healthy\n",
            "\n",
            "Please write the discharge note in plain language for the pet owner. ",
            "Summarizing what was done and what to watch for or what to do next.",
        );
        assert_eq!(build_prompt(&rex()), expected);
    }

    #[test]
    fn prompt_is_deterministic() {
        let record = rex();
        assert_eq!(build_prompt(&record), build_prompt(&record.clone()));
    }

    #[test]
    fn neutered_renders_yes_no() {
        let mut record = rex();
        assert!(build_prompt(&record).contains("Neutered: Yes\n"));

        record.patient.neutered = false;
        let prompt = build_prompt(&record);
        assert!(prompt.contains("Neutered: No\n"));
        assert!(!prompt.contains("Neutered: Yes"));
    }

    #[test]
    fn empty_notes_keep_header_only() {
        let mut record = rex();
        record.consultation.clinical_notes.clear();
        let prompt = build_prompt(&record);

        assert!(prompt.contains("Clinical Notes:\n    \nPlease write"));
        assert!(!prompt.contains("Healthy"));
    }

    #[test]
    fn each_note_on_its_own_line() {
        let mut record = rex();
        record.consultation.clinical_notes = vec![
            ClinicalNote {
                note: "Bright and alert".into(),
            },
            ClinicalNote {
                note: "Mild tartar".into(),
            },
        ];
        let prompt = build_prompt(&record);
        assert!(prompt.contains("Clinical Notes:\n     Bright and alert\n Mild tartar\n"));
    }

    #[test]
    fn empty_procedures_omit_section() {
        let prompt = build_prompt(&rex());
        assert!(!prompt.contains("Procedures performed"));
    }

    #[test]
    fn procedures_render_header_without_entries() {
        let mut record = rex();
        record.consultation.treatment_items = TreatmentItems {
            procedures: vec![procedure("Dental scale"), procedure("Nail clip")],
        };
        let prompt = build_prompt(&record);

        assert!(prompt.contains("\n\nProcedures performed: \n\nPlease write"));
        assert!(!prompt.contains("Dental scale"));
        assert!(!prompt.contains("Nail clip"));
        assert!(!prompt.contains(" - "));
    }

    #[test]
    fn prompt_is_trimmed() {
        let prompt = build_prompt(&rex());
        assert_eq!(prompt, prompt.trim());
        assert!(prompt.starts_with("You are a veterinary assistant."));
        assert!(prompt.ends_with("what to do next."));
    }
}
