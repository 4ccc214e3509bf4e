//! Inbound call and SMS handling.
//!
//! The telephony collaborator feeds raw events in; the monitor composes
//! controller state, settings, the bypass engine and auto-reply into a
//! decision the alert layer can act on. Auto-replies are best-effort: a
//! messenger failure is logged and never fails the pipeline.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bypass::{self, BypassReason, CallWindowCounter};
use crate::events::Event;
use crate::platform::{CallState, ContactDirectory, Messenger};
use crate::reply::AutoReplyEngine;
use crate::scheduler::QuietHoursController;
use crate::settings::{SettingsExt, SettingsStore};

/// What the ringer should do with an incoming call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "decision")]
pub enum RingDecision {
    /// Quiet hours are not suppressing; ring normally.
    Ring,
    /// Suppressing, but a bypass rule lets it through.
    Bypass { reason: BypassReason },
    /// Suppressed.
    Silence,
}

/// What the messaging app should do with an incoming SMS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "decision")]
pub enum SmsDecision {
    Deliver,
    Bypass { reason: BypassReason },
    Silence,
}

pub struct CallMonitor {
    controller: Arc<QuietHoursController>,
    store: Arc<dyn SettingsStore>,
    contacts: Arc<dyn ContactDirectory>,
    messenger: Arc<dyn Messenger>,
    counter: Mutex<CallWindowCounter>,
    call_replies: Mutex<AutoReplyEngine>,
    sms_replies: Mutex<AutoReplyEngine>,
}

impl CallMonitor {
    pub fn new(
        controller: Arc<QuietHoursController>,
        store: Arc<dyn SettingsStore>,
        contacts: Arc<dyn ContactDirectory>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        Self {
            controller,
            store,
            contacts,
            messenger,
            counter: Mutex::new(CallWindowCounter::new()),
            call_replies: Mutex::new(AutoReplyEngine::new()),
            sms_replies: Mutex::new(AutoReplyEngine::new()),
        }
    }

    pub fn controller(&self) -> &Arc<QuietHoursController> {
        &self.controller
    }

    /// Boot entry point: re-derive the schedule; counting starts fresh.
    pub fn on_boot_completed(&self) -> Option<Event> {
        self.on_boot_completed_at(Utc::now())
    }

    pub fn on_boot_completed_at(&self, now: DateTime<Utc>) -> Option<Event> {
        self.counter.lock().expect("counter poisoned").reset();
        self.controller.resync_at(now)
    }

    pub fn on_call_state_changed(
        &self,
        number: &str,
        state: CallState,
    ) -> (RingDecision, Vec<Event>) {
        self.on_call_state_changed_at(number, state, Utc::now())
    }

    pub fn on_call_state_changed_at(
        &self,
        number: &str,
        state: CallState,
        now: DateTime<Utc>,
    ) -> (RingDecision, Vec<Event>) {
        match state {
            CallState::Ringing => self.handle_ringing(number, now),
            CallState::Active => (RingDecision::Ring, Vec::new()),
            CallState::Idle => {
                // Call teardown: the auto-reply trigger for missed calls
                // while suppression was on.
                let mut events = Vec::new();
                if self.controller.is_suppressing() {
                    let policy = self.store.auto_reply_call_policy();
                    let contact = self.contacts.lookup(number);
                    let reply = self
                        .call_replies
                        .lock()
                        .expect("reply engine poisoned")
                        .maybe_reply(&policy, number, &contact, now);
                    if let Some(body) = reply {
                        self.send_reply(number, &body, now, &mut events);
                    }
                }
                (RingDecision::Ring, events)
            }
        }
    }

    pub fn on_sms_received(&self, number: &str, body: &str) -> (SmsDecision, Vec<Event>) {
        self.on_sms_received_at(number, body, Utc::now())
    }

    pub fn on_sms_received_at(
        &self,
        number: &str,
        body: &str,
        now: DateTime<Utc>,
    ) -> (SmsDecision, Vec<Event>) {
        if !self.controller.is_suppressing() {
            return (SmsDecision::Deliver, Vec::new());
        }

        let contact = self.contacts.lookup(number);
        let reason = bypass::should_bypass_sms(
            self.store.sms_bypass_policy(),
            &self.store.whitelist(),
            number,
            &contact,
            body,
            &self.store.sms_bypass_code(),
        );

        match reason {
            Some(reason) => (
                SmsDecision::Bypass { reason },
                vec![Event::SmsBypassed {
                    number: number.to_string(),
                    reason,
                    at: now,
                }],
            ),
            None => {
                let mut events = vec![Event::SmsSilenced {
                    number: number.to_string(),
                    notify: self.store.notifications_enabled(),
                    at: now,
                }];
                let policy = self.store.auto_reply_sms_policy();
                let reply = self
                    .sms_replies
                    .lock()
                    .expect("reply engine poisoned")
                    .maybe_reply(&policy, number, &contact, now);
                if let Some(body) = reply {
                    self.send_reply(number, &body, now, &mut events);
                }
                (SmsDecision::Silence, events)
            }
        }
    }

    fn handle_ringing(&self, number: &str, now: DateTime<Utc>) -> (RingDecision, Vec<Event>) {
        if !self.controller.is_suppressing() {
            return (RingDecision::Ring, Vec::new());
        }

        let contact = self.contacts.lookup(number);
        let reason = bypass::should_bypass_call(
            self.store.call_bypass_policy(),
            &self.store.whitelist(),
            number,
            &contact,
            &mut self.counter.lock().expect("counter poisoned"),
            self.store.required_call_count(),
            now,
        );

        match reason {
            Some(reason) => {
                tracing::info!(number, ?reason, "call bypassing quiet hours");
                (
                    RingDecision::Bypass { reason },
                    vec![Event::CallBypassed {
                        number: number.to_string(),
                        reason,
                        at: now,
                    }],
                )
            }
            None => (
                RingDecision::Silence,
                vec![Event::CallSilenced {
                    number: number.to_string(),
                    notify: self.store.notifications_enabled(),
                    at: now,
                }],
            ),
        }
    }

    fn send_reply(&self, number: &str, body: &str, now: DateTime<Utc>, events: &mut Vec<Event>) {
        match self.messenger.send_text(number, body) {
            Ok(()) => events.push(Event::AutoReplySent {
                number: number.to_string(),
                at: now,
            }),
            Err(err) => {
                tracing::warn!(number, %err, "auto-reply send failed, dropping");
            }
        }
    }
}
