//! In-memory fakes for the store traits plus message fixtures, shared by the
//! integration suites.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use hr_events_service::db::{EventLedger, HistoryStore, ProfileStore};
use hr_events_service::error::{AppError, Result};
use hr_events_service::kafka::DeliveredMessage;
use hr_events_service::models::{
    AuditEvent, Contacts, DeadLetter, EmployeeProfile, EmploymentRecord, Envelope, EventKind,
    HistoryPayload, NewAuditEvent, NewDeadLetter, NewEmploymentRecord, Period, PersonalFields,
    PersonalPayload, PositionFields, PositionPayload,
};

fn opt(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn unavailable() -> AppError {
    AppError::Internal("store unavailable".into())
}

#[derive(Default)]
pub struct FakeLedger {
    pub audits: Mutex<Vec<NewAuditEvent>>,
    pub dead_letters: Mutex<Vec<NewDeadLetter>>,
    fail: AtomicBool,
}

impl FakeLedger {
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }

    pub fn audit_count(&self) -> usize {
        self.audits.lock().unwrap().len()
    }

    pub fn dead_letter_count(&self) -> usize {
        self.dead_letters.lock().unwrap().len()
    }

    pub fn last_dead_letter_error(&self) -> Option<String> {
        self.dead_letters
            .lock()
            .unwrap()
            .last()
            .map(|d| d.error.clone())
    }
}

#[async_trait]
impl EventLedger for FakeLedger {
    async fn exists_message(&self, message_id: Uuid) -> Result<bool> {
        self.check()?;
        Ok(self
            .audits
            .lock()
            .unwrap()
            .iter()
            .any(|a| a.message_id == message_id))
    }

    async fn insert_audit(&self, event: NewAuditEvent) -> Result<bool> {
        self.check()?;
        let mut audits = self.audits.lock().unwrap();
        if audits.iter().any(|a| a.message_id == event.message_id) {
            return Ok(false);
        }
        audits.push(event);
        Ok(true)
    }

    async fn insert_dead_letter(&self, dead_letter: NewDeadLetter) -> Result<()> {
        self.check()?;
        self.dead_letters.lock().unwrap().push(dead_letter);
        Ok(())
    }

    async fn list_audit(&self, limit: i64, offset: i64) -> Result<Vec<AuditEvent>> {
        self.check()?;
        let audits = self.audits.lock().unwrap();
        Ok(audits
            .iter()
            .enumerate()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|(i, a)| AuditEvent {
                id: i as i64 + 1,
                message_id: a.message_id,
                topic: a.topic.clone(),
                partition: a.partition,
                offset: a.offset,
                payload: serde_json::from_str(&a.payload).unwrap_or(serde_json::Value::Null),
                received_at: Utc::now(),
            })
            .collect())
    }

    async fn list_dead_letters(&self, limit: i64, offset: i64) -> Result<Vec<DeadLetter>> {
        self.check()?;
        let dead_letters = self.dead_letters.lock().unwrap();
        Ok(dead_letters
            .iter()
            .enumerate()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|(i, d)| DeadLetter {
                id: i as i64 + 1,
                topic: d.topic.clone(),
                key: d.key.clone(),
                payload: d.payload.clone(),
                error: d.error.clone(),
                received_at: Utc::now(),
            })
            .collect())
    }

    async fn reset_all(&self) -> Result<()> {
        self.check()?;
        self.audits.lock().unwrap().clear();
        self.dead_letters.lock().unwrap().clear();
        Ok(())
    }
}

#[derive(Default)]
struct ProfileEntry {
    personal: Option<PersonalFields>,
    position: Option<PositionFields>,
}

#[derive(Default)]
pub struct FakeProfileStore {
    entries: Mutex<HashMap<String, ProfileEntry>>,
    fail: AtomicBool,
    pub personal_writes: AtomicUsize,
    pub position_writes: AtomicUsize,
}

impl FakeProfileStore {
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }

    /// Create a profile directly, bypassing the processors.
    pub fn seed_personal(&self, employee_id: &str, fields: PersonalFields) {
        self.entries
            .lock()
            .unwrap()
            .entry(employee_id.to_string())
            .or_default()
            .personal = Some(fields);
    }

    pub fn personal(&self, employee_id: &str) -> Option<PersonalFields> {
        self.entries
            .lock()
            .unwrap()
            .get(employee_id)
            .and_then(|e| e.personal.clone())
    }

    pub fn position(&self, employee_id: &str) -> Option<PositionFields> {
        self.entries
            .lock()
            .unwrap()
            .get(employee_id)
            .and_then(|e| e.position.clone())
    }
}

#[async_trait]
impl ProfileStore for FakeProfileStore {
    async fn upsert_personal_fields(
        &self,
        employee_id: &str,
        fields: PersonalFields,
    ) -> Result<()> {
        self.check()?;
        self.personal_writes.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()
            .unwrap()
            .entry(employee_id.to_string())
            .or_default()
            .personal = Some(fields);
        Ok(())
    }

    async fn upsert_position_fields(
        &self,
        employee_id: &str,
        fields: PositionFields,
    ) -> Result<()> {
        self.check()?;
        self.position_writes.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()
            .unwrap()
            .entry(employee_id.to_string())
            .or_default()
            .position = Some(fields);
        Ok(())
    }

    async fn get(&self, employee_id: &str) -> Result<Option<EmployeeProfile>> {
        self.check()?;
        let entries = self.entries.lock().unwrap();
        Ok(entries.get(employee_id).map(|e| {
            let p = e.personal.clone().unwrap_or_default();
            let pos = e.position.clone().unwrap_or_default();
            EmployeeProfile {
                employee_id: employee_id.to_string(),
                first_name: opt(&p.first_name),
                last_name: opt(&p.last_name),
                birth_date: opt(&p.birth_date),
                email: opt(&p.email),
                phone: opt(&p.phone),
                title: opt(&pos.title),
                department: opt(&pos.department),
                grade: opt(&pos.grade),
                effective_from: opt(&pos.effective_from),
                updated_at: Utc::now(),
            }
        }))
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<EmployeeProfile>> {
        self.check()?;
        let mut ids: Vec<String> = self.entries.lock().unwrap().keys().cloned().collect();
        ids.sort();
        let mut profiles = Vec::new();
        for id in ids.into_iter().skip(offset as usize).take(limit as usize) {
            if let Some(profile) = self.get(&id).await? {
                profiles.push(profile);
            }
        }
        Ok(profiles)
    }
}

#[derive(Default)]
pub struct FakeHistoryStore {
    pub records: Mutex<Vec<NewEmploymentRecord>>,
    fail: AtomicBool,
}

impl FakeHistoryStore {
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl HistoryStore for FakeHistoryStore {
    async fn append(&self, record: NewEmploymentRecord) -> Result<i64> {
        self.check()?;
        let mut records = self.records.lock().unwrap();
        records.push(record);
        Ok(records.len() as i64)
    }

    async fn list_by_employee(&self, employee_id: &str) -> Result<Vec<EmploymentRecord>> {
        self.check()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .enumerate()
            .filter(|(_, r)| r.employee_id == employee_id)
            .map(|(i, r)| EmploymentRecord {
                id: i as i64 + 1,
                employee_id: r.employee_id.clone(),
                company: r.company.clone(),
                position: r.position.clone(),
                period_from: r.period_from.clone(),
                period_to: r.period_to.clone(),
                stack: r.stack.clone(),
                created_at: Utc::now(),
            })
            .collect())
    }
}

// ---- message fixtures ----

pub fn envelope_bytes<T: Serialize>(
    kind: EventKind,
    message_id: Uuid,
    employee_id: &str,
    payload: T,
) -> Vec<u8> {
    let envelope = Envelope {
        kind,
        message_id: message_id.to_string(),
        employee_id: employee_id.to_string(),
        payload,
        timestamp: Utc::now(),
        source: "test-suite".to_string(),
    };
    serde_json::to_vec(&envelope).unwrap()
}

pub fn delivered<'a>(topic: &'a str, offset: i64, key: &'a str, payload: &'a [u8]) -> DeliveredMessage<'a> {
    DeliveredMessage {
        topic,
        partition: 0,
        offset,
        key: Some(key.as_bytes()),
        payload,
    }
}

pub fn personal_payload(employee_id: &str, first_name: &str) -> PersonalPayload {
    PersonalPayload {
        employee_id: employee_id.to_string(),
        first_name: first_name.to_string(),
        last_name: "Ivanova".to_string(),
        birth_date: "1994-06-12".to_string(),
        contacts: Contacts {
            email: "anna@example.com".to_string(),
            phone: "+1-555-0100".to_string(),
        },
    }
}

pub fn position_payload(employee_id: &str) -> PositionPayload {
    PositionPayload {
        employee_id: employee_id.to_string(),
        title: "QA Engineer".to_string(),
        department: "Quality".to_string(),
        grade: "Middle".to_string(),
        effective_from: "2025-10-01".to_string(),
    }
}

pub fn history_payload(employee_id: &str) -> HistoryPayload {
    HistoryPayload {
        employee_id: employee_id.to_string(),
        company: "Acme".to_string(),
        position: Some("QA".to_string()),
        period: Period {
            from: "2022-07-01".to_string(),
            to: "2025-09-30".to_string(),
        },
        stack: vec!["Rust".to_string(), "Postgres".to_string()],
    }
}
