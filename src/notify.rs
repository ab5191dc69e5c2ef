// ============================================================================
// Notifications (toasts)
// ============================================================================
// File de messages non-bloquants affichés en haut à droite
//
// CONCEPTS :
// 1. VecDeque : FIFO, ajout à la fin, expiration par l'avant
// 2. TTL : chaque notification disparaît après une durée fixe
// 3. Pas de dédoublonnage : un envoi de pari = exactement un message
// ============================================================================

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Type de notification (détermine la couleur)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Identifiant d'une notification
pub type NotificationId = u64;

/// Une notification en attente d'expiration
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    pub created: Instant,
    pub ttl: Duration,
}

impl Notification {
    /// Vrai tant que le TTL n'est pas écoulé
    pub fn is_visible(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created) < self.ttl
    }

    /// 1.0 → vient d'arriver, 0.0 → expirée
    pub fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.created).as_secs_f32();
        (1.0 - elapsed / self.ttl.as_secs_f32()).clamp(0.0, 1.0)
    }
}

/// File de notifications avec TTL
pub struct NotificationQueue {
    queue: VecDeque<Notification>,
    ttl: Duration,
    next_id: NotificationId,
}

impl NotificationQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            queue: VecDeque::new(),
            ttl,
            next_id: 1,
        }
    }

    /// Ajoute une notification, toujours (jamais fusionnée avec une autre)
    pub fn push(
        &mut self,
        kind: NotificationKind,
        message: impl Into<String>,
        now: Instant,
    ) -> NotificationId {
        let id = self.next_id;
        self.next_id += 1;

        self.queue.push_back(Notification {
            id,
            kind,
            message: message.into(),
            created: now,
            ttl: self.ttl,
        });

        id
    }

    /// Supprime les notifications expirées (appelé à chaque tick)
    pub fn retain_visible(&mut self, now: Instant) {
        self.queue.retain(|n| n.is_visible(now));
    }

    /// Ferme la notification la plus récente
    pub fn dismiss_latest(&mut self) -> Option<Notification> {
        self.queue.pop_back()
    }

    /// Notifications visibles, la plus récente en premier
    pub fn visible(&self, now: Instant) -> Vec<&Notification> {
        self.queue.iter().rev().filter(|n| n.is_visible(now)).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
