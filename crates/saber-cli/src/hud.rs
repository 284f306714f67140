use saber_core::{FrameOutput, MatchStatus, PlayerSlot, HEALTH_BUCKETS};

/// Text HUD: reports the match whenever something a player would notice changes.
#[derive(Debug, Default)]
pub struct Hud {
    last: Option<(MatchStatus, u32, u32)>,
}

impl Hud {
    /// Lines to print for this output. Empty when nothing changed.
    pub fn update(&mut self, out: &FrameOutput) -> Vec<String> {
        let mut lines = Vec::new();
        for hit in &out.hits {
            lines.push(format!(
                "{} hits {}! {} hp left",
                hit.attacker, hit.target, hit.hp_after
            ));
        }

        let current = (out.status, out.hp_left, out.hp_right);
        if self.last != Some(current) {
            lines.push(format!(
                "{} {} | {} {} | {}",
                health_bar(out, PlayerSlot::Left),
                out.hp_left,
                out.hp_right,
                health_bar(out, PlayerSlot::Right),
                out.status
            ));
            self.last = Some(current);
        }

        if out.finished_this_tick {
            if let Some(winner) = out.winner {
                lines.push(format!("{} wins! Type `reset` for a rematch", winner));
            }
        }
        lines
    }
}

fn health_bar(out: &FrameOutput, slot: PlayerSlot) -> String {
    let filled = *out.health_buckets.get(slot) as usize;
    let empty = HEALTH_BUCKETS as usize - filled.min(HEALTH_BUCKETS as usize);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(empty))
}

#[cfg(test)]
mod tests {
    use saber_core::{HitEvent, MatchInstant, SlotPair};

    use super::*;

    fn output(hp_left: u32, hp_right: u32, status: MatchStatus) -> FrameOutput {
        FrameOutput {
            hp_left,
            hp_right,
            health_buckets: SlotPair::new(
                saber_core::health_bucket(hp_left, 100),
                saber_core::health_bucket(hp_right, 100),
            ),
            status,
            ..Default::default()
        }
    }

    #[test]
    fn test_reports_only_changes() {
        let mut hud = Hud::default();
        let waiting = output(100, 100, MatchStatus::WaitingForPlayers);
        let lines = hud.update(&waiting);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Show two people side-by-side"));
        assert!(hud.update(&waiting).is_empty());

        let mut hit = output(100, 92, MatchStatus::Tracking);
        hit.hits.push(HitEvent {
            target: PlayerSlot::Right,
            attacker: PlayerSlot::Left,
            hp_after: 92,
            at: MatchInstant::from_secs(3.0),
        });
        let lines = hud.update(&hit);
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "[##########] 100 | 92 [##########] | Tracking 2 players"
        );
    }

    #[test]
    fn test_announces_winner_once() {
        let mut hud = Hud::default();
        let mut done = output(0, 40, MatchStatus::Tracking);
        done.winner = Some(PlayerSlot::Right);
        done.finished_this_tick = true;
        let lines = hud.update(&done);
        assert!(lines.last().unwrap().starts_with("Right wins"));
        assert!(lines[0].starts_with("[----------] 0"));

        done.finished_this_tick = false;
        assert!(hud.update(&done).is_empty());
    }
}
