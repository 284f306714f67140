use approx::assert_relative_eq;
use saber_core::{
    body, hand, FrameSettings, Handedness, MatchInstant, MatchPhase, MatchSettings, MatchStatus,
    NormalizedLandmark, PlayerSlot, RawHand, RuleSettings, SensorFrame, TrackerSettings,
};
use saber_world::MatchEngine;

// A 1000x1000 frame keeps normalized and pixel coordinates a factor 1000 apart.
const SIZE: f64 = 1000.0;

fn lm(x: f64, y: f64) -> NormalizedLandmark {
    NormalizedLandmark::new(x / SIZE, y / SIZE)
}

/// Shoulders 100 px apart, hips 90 px apart, both sides 150 px long, centered on
/// `(cx, cy)`.
fn fighter(cx: f64, cy: f64) -> Vec<NormalizedLandmark> {
    let vertical = (150.0f64 * 150.0 - 5.0 * 5.0).sqrt();
    let mut lms = vec![lm(cx, cy); 33];
    lms[body::LEFT_SHOULDER] = lm(cx - 50.0, cy - vertical / 2.0);
    lms[body::RIGHT_SHOULDER] = lm(cx + 50.0, cy - vertical / 2.0);
    lms[body::LEFT_HIP] = lm(cx - 45.0, cy + vertical / 2.0);
    lms[body::RIGHT_HIP] = lm(cx + 45.0, cy + vertical / 2.0);
    lms
}

fn hand_pointing(palm: (f64, f64), tip: (f64, f64)) -> RawHand {
    let mut landmarks = vec![lm(palm.0, palm.1); 21];
    landmarks[hand::INDEX_FINGER_TIP] = lm(tip.0, tip.1);
    RawHand {
        landmarks,
        handedness: Handedness::Right,
        score: 0.9,
    }
}

fn settings(rules: RuleSettings) -> MatchSettings {
    MatchSettings {
        frame: FrameSettings {
            width: SIZE,
            height: SIZE,
        },
        tracker: TrackerSettings {
            calibration_scale: 1.0,
            ..Default::default()
        },
        rules,
        ..Default::default()
    }
}

fn both_fighters() -> SensorFrame {
    SensorFrame {
        timestamp_ms: 0.0,
        bodies: vec![fighter(700.0, 300.0), fighter(300.0, 300.0)],
        hands: vec![],
    }
}

/// Left thrusts horizontally into Right's box.
fn left_strikes() -> SensorFrame {
    SensorFrame {
        hands: vec![hand_pointing((450.0, 300.0), (460.0, 300.0))],
        ..both_fighters()
    }
}

fn at(secs: f64) -> MatchInstant {
    MatchInstant::from_secs(secs)
}

#[test]
fn calibration_shares_one_box_size() {
    let mut engine = MatchEngine::new(&settings(RuleSettings::default())).unwrap();
    let out = engine.tick(&both_fighters(), at(0.0));

    assert!(out.calibrated);
    let left = out.hitboxes.left.unwrap();
    let right = out.hitboxes.right.unwrap();
    for hitbox in [left, right] {
        assert_relative_eq!(hitbox.w, 220.0, epsilon = 1e-9);
        assert_relative_eq!(hitbox.h, 300.0, epsilon = 1e-9);
    }
    // Default offsets push both boxes 60 px toward each other
    assert_relative_eq!(left.x, 300.0 - 110.0 + 60.0, epsilon = 1e-9);
    assert_relative_eq!(right.x, 700.0 - 110.0 - 60.0, epsilon = 1e-9);
    assert_relative_eq!(left.y, 150.0, epsilon = 1e-9);
}

#[test]
fn strike_respects_cooldown() {
    let mut engine = MatchEngine::new(&settings(RuleSettings {
        max_hp: 100,
        hit_damage: 8,
        hit_cooldown_ms: 250,
    }))
    .unwrap();
    engine.tick(&both_fighters(), at(0.0));

    let out = engine.tick(&left_strikes(), at(0.1));
    let blade = out.blades.left.unwrap();
    assert_relative_eq!(blade.p1.x, 450.0, epsilon = 1e-9);
    assert_relative_eq!(blade.p2.x, 630.0, epsilon = 1e-9);
    assert!(out.blades.right.is_none());
    assert_eq!(out.hits.len(), 1);
    assert_eq!(out.hits[0].target, PlayerSlot::Right);
    assert_eq!(out.hits[0].attacker, PlayerSlot::Left);
    assert_eq!(out.hp_right, 92);
    assert_eq!(out.hp_left, 100);

    // Sustained contact 100 ms later is the same swing
    let out = engine.tick(&left_strikes(), at(0.2));
    assert!(out.hits.is_empty());
    assert_eq!(out.hp_right, 92);

    let out = engine.tick(&left_strikes(), at(0.5));
    assert_eq!(out.hits.len(), 1);
    assert_eq!(out.hp_right, 84);
    assert_eq!(out.health_buckets.right, 9);
}

#[test]
fn match_finishes_once() {
    let mut engine = MatchEngine::new(&settings(RuleSettings {
        max_hp: 16,
        hit_damage: 8,
        hit_cooldown_ms: 250,
    }))
    .unwrap();
    engine.tick(&both_fighters(), at(0.0));

    let out = engine.tick(&left_strikes(), at(1.0));
    assert!(!out.finished_this_tick);
    let out = engine.tick(&left_strikes(), at(2.0));
    assert_eq!(out.hp_right, 0);
    assert_eq!(out.winner, Some(PlayerSlot::Left));
    assert_eq!(out.phase, MatchPhase::Finished(PlayerSlot::Left));
    assert!(out.finished_this_tick);

    let out = engine.tick(&left_strikes(), at(3.0));
    assert!(!out.finished_this_tick);
    assert!(out.hits.is_empty());
    assert_eq!(out.winner, Some(PlayerSlot::Left));
    assert_eq!(out.health_buckets.right, 0);
}

#[test]
fn no_hits_without_calibration() {
    let mut engine = MatchEngine::new(&settings(RuleSettings::default())).unwrap();
    let lone_striker = SensorFrame {
        bodies: vec![fighter(300.0, 300.0)],
        hands: vec![hand_pointing((450.0, 300.0), (460.0, 300.0))],
        ..Default::default()
    };
    let out = engine.tick(&lone_striker, at(0.0));
    assert_eq!(out.status, MatchStatus::WaitingForPlayers);
    assert!(out.hitboxes.left.is_none());
    // The blade is tracked even while waiting
    assert!(out.blades.left.is_some());
    assert!(out.hits.is_empty());
}

#[test]
fn reset_mid_match_recalibrates() {
    let mut engine = MatchEngine::new(&settings(RuleSettings::default())).unwrap();
    engine.tick(&both_fighters(), at(0.0));
    engine.tick(&left_strikes(), at(1.0));
    assert_eq!(engine.hp(PlayerSlot::Right), 92);

    engine.reset();
    let out = engine.output();
    assert_eq!(out.hp_left, 100);
    assert_eq!(out.hp_right, 100);
    assert!(out.winner.is_none());
    assert!(!out.calibrated);
    assert_eq!(out.hitboxes.count_some(), 0);

    let out = engine.tick(&both_fighters(), at(1.05));
    assert_eq!(out.status, MatchStatus::Calibrated);
    assert_eq!(out.phase, MatchPhase::InProgress);

    // Well inside the old cooldown window, but the reset cleared it
    let out = engine.tick(&left_strikes(), at(1.1));
    assert_eq!(out.hp_right, 92);
}

#[test]
fn dropped_player_clears_box_and_blocks_hits() {
    let mut engine = MatchEngine::new(&settings(RuleSettings::default())).unwrap();
    engine.tick(&both_fighters(), at(0.0));

    let right_gone = SensorFrame {
        bodies: vec![fighter(300.0, 300.0)],
        hands: vec![hand_pointing((450.0, 300.0), (460.0, 300.0))],
        ..Default::default()
    };
    let out = engine.tick(&right_gone, at(1.0));
    assert_eq!(out.status, MatchStatus::NeedsRecalibration);
    assert!(out.hitboxes.right.is_none());
    assert!(out.hits.is_empty());
    assert_eq!(out.hp_right, 100);
}
