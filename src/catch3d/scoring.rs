//! Scoring state machine
//!
//! Each ball is `Active` until its first contact with the glove, then
//! `Scored` for the rest of the session. Only the `Active -> Scored`
//! transition adds to the score, so a contact that lasts many frames
//! counts once.

use bevy::log::info;
use bevy::prelude::*;

use crate::catch3d::collision::ContactReport;
use crate::catch3d::types::{ObjectId, ObjectPool, ScoredPolicy, ScoringSettings, Target};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ObjectState {
    #[default]
    Active,
    Scored,
}

/// Transient "score" popup. The UI owns the text; this only says what to
/// show, where, and until when.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreNotification {
    pub score: u32,
    pub object: ObjectId,
    /// Normalized viewport position (0..1 on both axes).
    pub screen_anchor: Vec2,
    pub issued_at_ms: f64,
    pub expires_at_ms: f64,
}

impl ScoreNotification {
    pub fn text(&self) -> String {
        format!("Caught! Score: {}", self.score)
    }

    pub fn is_expired(&self, now_ms: f64) -> bool {
        now_ms >= self.expires_at_ms
    }
}

pub struct ScoreBoard {
    score: u32,
    states: Vec<ObjectState>,
    notifications: Vec<ScoreNotification>,
    display_ms: f64,
    policy: ScoredPolicy,
    screen_anchor: Vec2,
}

impl ScoreBoard {
    pub fn new(pool_len: usize, settings: &ScoringSettings) -> Self {
        Self {
            score: 0,
            states: vec![ObjectState::Active; pool_len],
            notifications: Vec::new(),
            display_ms: settings.display_ms,
            policy: settings.policy,
            screen_anchor: Vec2::splat(0.5),
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn state(&self, id: ObjectId) -> Option<ObjectState> {
        self.states.get(id.0).copied()
    }

    pub fn is_active(&self, id: ObjectId) -> bool {
        self.state(id) == Some(ObjectState::Active)
    }

    pub fn notifications(&self) -> &[ScoreNotification] {
        &self.notifications
    }

    /// Where new popups are placed (normalized viewport coordinates).
    pub fn set_screen_anchor(&mut self, anchor: Vec2) {
        self.screen_anchor = anchor.clamp(Vec2::ZERO, Vec2::ONE);
    }

    /// Scores every `Active` ball with a positive contact and returns the
    /// notifications issued this frame.
    pub fn apply(
        &mut self,
        contacts: &[ContactReport],
        now_ms: f64,
        pool: &mut ObjectPool,
        target: &Target,
    ) -> Vec<ScoreNotification> {
        let mut issued = Vec::new();

        for report in contacts.iter().filter(|r| r.contact) {
            let Some(state) = self.states.get_mut(report.object.0) else {
                continue;
            };
            if *state != ObjectState::Active {
                continue;
            }
            let Some(object) = pool.get_mut(report.object) else {
                continue;
            };

            *state = ObjectState::Scored;
            self.score = self.score.saturating_add(1);

            match self.policy {
                ScoredPolicy::Hide => object.visible = false,
                ScoredPolicy::StickToTarget => {
                    object.attachment = Some(target.to_local(object.position));
                }
            }

            let notification = ScoreNotification {
                score: self.score,
                object: report.object,
                screen_anchor: self.screen_anchor,
                issued_at_ms: now_ms,
                expires_at_ms: now_ms + self.display_ms,
            };
            info!("{} caught; score is now {}", report.object, self.score);
            self.notifications.push(notification);
            issued.push(notification);
        }

        issued
    }

    /// Drops popups whose display time has passed. Returns how many went.
    pub fn expire(&mut self, now_ms: f64) -> usize {
        let before = self.notifications.len();
        self.notifications.retain(|n| !n.is_expired(now_ms));
        before - self.notifications.len()
    }
}
