//! Business validation rules for the three payload kinds.
//!
//! The allowed-grade set and date shape are process-wide constants: the rules
//! value is built once at startup and injected into the processors, never
//! mutated. Every check returns a human-readable reason string that goes
//! verbatim into the dead-letter record.

use chrono::NaiveDate;
use regex::Regex;

use crate::models::{Grade, HistoryPayload, PersonalPayload, PositionPayload};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct ValidationRules {
    date_re: Regex,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            date_re: Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static date regex"),
        }
    }
}

impl ValidationRules {
    fn valid_date(&self, s: &str) -> bool {
        self.date_re.is_match(s) && NaiveDate::parse_from_str(s, DATE_FORMAT).is_ok()
    }

    pub fn validate_personal(&self, p: &PersonalPayload) -> Result<(), String> {
        if p.first_name.trim().is_empty() || p.last_name.trim().is_empty() {
            return Err(format!(
                "invalid name: first_name={} last_name={}",
                p.first_name, p.last_name
            ));
        }

        if !self.valid_date(&p.birth_date) {
            return Err(format!("invalid date format: birth_date={}", p.birth_date));
        }

        if !p.contacts.email.is_empty() && !p.contacts.email.contains('@') {
            return Err(format!("invalid email: email={}", p.contacts.email));
        }

        Ok(())
    }

    pub fn validate_position(&self, p: &PositionPayload) -> Result<(), String> {
        if p.title.trim().is_empty() {
            return Err("missing position title".to_string());
        }

        if p.department.trim().is_empty() {
            return Err("missing department".to_string());
        }

        if !p.grade.is_empty() {
            p.grade.parse::<Grade>()?;
        }

        if !self.valid_date(&p.effective_from) {
            return Err(format!("invalid date: effective_from={}", p.effective_from));
        }

        Ok(())
    }

    pub fn validate_history(&self, p: &HistoryPayload) -> Result<(), String> {
        if p.company.trim().is_empty() {
            return Err("missing required field company".to_string());
        }

        if p.period.from.is_empty() || p.period.to.is_empty() {
            return Err("missing required field period".to_string());
        }

        if !self.valid_date(&p.period.from) || !self.valid_date(&p.period.to) {
            return Err(format!(
                "invalid date: period.from={} period.to={}",
                p.period.from, p.period.to
            ));
        }

        let from = NaiveDate::parse_from_str(&p.period.from, DATE_FORMAT)
            .map_err(|e| format!("invalid date: period.from={}: {e}", p.period.from))?;
        let to = NaiveDate::parse_from_str(&p.period.to, DATE_FORMAT)
            .map_err(|e| format!("invalid date: period.to={}: {e}", p.period.to))?;

        if to < from {
            return Err(format!(
                "invalid period: period.from={} period.to={}",
                p.period.from, p.period.to
            ));
        }

        Ok(())
    }
}
