//! Deterministic synthetic bodies for the simulated sensor
//!
//! Each body stands facing the camera and waves both arms. Over time the
//! scene also walks through the cases a real sensor produces: a body that
//! leaves and re-enters, joints that drop to inferred or untracked, and every
//! hand state.

use std::time::Duration;

use bodyview_core::{
    Body, BodyFrame, HandState, JointMap, JointType, SensorConfig, TrackingState, Vec3,
};

/// Standing pose relative to the spine base, meters, camera space (Y up)
const POSE: [(JointType, [f32; 3]); JointType::COUNT] = [
    (JointType::SpineBase, [0.0, 0.0, 0.0]),
    (JointType::SpineMid, [0.0, 0.30, -0.02]),
    (JointType::Neck, [0.0, 0.60, -0.02]),
    (JointType::Head, [0.0, 0.75, 0.0]),
    (JointType::ShoulderLeft, [-0.18, 0.52, 0.0]),
    (JointType::ElbowLeft, [-0.30, 0.28, 0.02]),
    (JointType::WristLeft, [-0.35, 0.05, 0.0]),
    (JointType::HandLeft, [-0.36, -0.02, 0.0]),
    (JointType::ShoulderRight, [0.18, 0.52, 0.0]),
    (JointType::ElbowRight, [0.30, 0.28, 0.02]),
    (JointType::WristRight, [0.35, 0.05, 0.0]),
    (JointType::HandRight, [0.36, -0.02, 0.0]),
    (JointType::HipLeft, [-0.09, -0.04, 0.0]),
    (JointType::KneeLeft, [-0.10, -0.46, 0.02]),
    (JointType::AnkleLeft, [-0.10, -0.86, 0.0]),
    (JointType::FootLeft, [-0.10, -0.92, -0.10]),
    (JointType::HipRight, [0.09, -0.04, 0.0]),
    (JointType::KneeRight, [0.10, -0.46, 0.02]),
    (JointType::AnkleRight, [0.10, -0.86, 0.0]),
    (JointType::FootRight, [0.10, -0.92, -0.10]),
    (JointType::SpineShoulder, [0.0, 0.52, -0.02]),
    (JointType::HandTipLeft, [-0.37, -0.10, 0.0]),
    (JointType::ThumbLeft, [-0.32, -0.04, -0.03]),
    (JointType::HandTipRight, [0.37, -0.10, 0.0]),
    (JointType::ThumbRight, [0.32, -0.04, -0.03]),
];

const LEFT_ARM: [JointType; 5] = [
    JointType::ElbowLeft,
    JointType::WristLeft,
    JointType::HandLeft,
    JointType::HandTipLeft,
    JointType::ThumbLeft,
];

const RIGHT_ARM: [JointType; 5] = [
    JointType::ElbowRight,
    JointType::WristRight,
    JointType::HandRight,
    JointType::HandTipRight,
    JointType::ThumbRight,
];

const HAND_CYCLE: [HandState; 4] = [
    HandState::Open,
    HandState::Closed,
    HandState::Lasso,
    HandState::Unknown,
];

const FALLBACK_FRAME_PERIOD: Duration = Duration::from_nanos(33_333_333);

/// Seconds of each 10 s cycle that secondary bodies are out of view
const ABSENT_FROM: f32 = 8.0;

/// Generates body frames as a pure function of the frame index
#[derive(Debug, Clone)]
pub struct SimulatedScene {
    body_count: usize,
    simulated_bodies: usize,
    frame_rate: f32,
}

impl SimulatedScene {
    pub fn new(config: &SensorConfig) -> Self {
        Self {
            body_count: config.body_count,
            simulated_bodies: config.simulated_bodies.min(config.body_count),
            frame_rate: config.frame_rate,
        }
    }

    /// Slots per frame
    pub fn body_count(&self) -> usize {
        self.body_count
    }

    /// Time between frames; rates outside the accepted range fall back to 30 Hz
    pub fn frame_period(&self) -> Duration {
        Duration::try_from_secs_f32(1.0 / self.frame_rate)
            .ok()
            .filter(|period| !period.is_zero())
            .unwrap_or(FALLBACK_FRAME_PERIOD)
    }

    /// Sensor-relative timestamp of frame `index`
    pub fn relative_time(&self, index: u64) -> Duration {
        Duration::try_from_secs_f64(index as f64 / self.frame_rate as f64).unwrap_or_default()
    }

    /// Slot that body `n` occupies; spread out so some slots stay empty
    pub fn slot_of(&self, n: usize) -> usize {
        n * self.body_count / self.simulated_bodies.max(1)
    }

    /// Full frame at `index`
    pub fn frame(&self, index: u64) -> BodyFrame {
        let t = index as f32 / self.frame_rate;
        let mut bodies = vec![None; self.body_count];
        for n in 0..self.simulated_bodies {
            bodies[self.slot_of(n)] = Some(self.body(n, t));
        }
        BodyFrame {
            relative_time: self.relative_time(index),
            bodies,
        }
    }

    /// Body `n` at time `t` seconds
    pub fn body(&self, n: usize, t: f32) -> Body {
        if n > 0 && t % 10.0 >= ABSENT_FROM {
            return Body::default();
        }

        let spread = (n as f32 - (self.simulated_bodies as f32 - 1.0) * 0.5) * 0.8;
        let origin = Vec3::new(
            spread + 0.1 * (0.5 * t + n as f32).sin(),
            0.0,
            2.5 + 0.3 * n as f32,
        );

        let phase = n as f32 * 1.3;
        let wave = 0.9 * (std::f32::consts::TAU * 0.25 * t + phase).sin().max(0.0);
        let occluded = t % 3.0 >= 2.0;

        let mut joints = JointMap::default();
        for (joint_type, offset) in POSE {
            joints.set(joint_type, origin + Vec3::from(offset), TrackingState::Tracked);
        }
        // Arms swing outwards and up around the shoulders
        rotate_arm(&mut joints, JointType::ShoulderLeft, &LEFT_ARM, -wave);
        rotate_arm(&mut joints, JointType::ShoulderRight, &RIGHT_ARM, wave);

        if occluded {
            joints[JointType::AnkleLeft].tracking_state = TrackingState::Inferred;
            joints[JointType::FootLeft].tracking_state = TrackingState::Inferred;
            joints[JointType::HandTipRight].tracking_state = TrackingState::NotTracked;
        }

        let step = (t / 2.0) as usize + n;
        let right = if occluded {
            HandState::NotTracked
        } else {
            HAND_CYCLE[step % HAND_CYCLE.len()]
        };
        let left = HAND_CYCLE[(step + 2) % HAND_CYCLE.len()];

        Body::tracked(1000 + n as u64, joints).with_hands(left, right)
    }
}

fn rotate_arm(joints: &mut JointMap, shoulder: JointType, arm: &[JointType], angle: f32) {
    let pivot = joints[shoulder].position;
    let (sin, cos) = angle.sin_cos();
    for joint_type in arm {
        let d = joints[*joint_type].position - pivot;
        joints[*joint_type].position =
            pivot + Vec3::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos, d.z);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(simulated_bodies: usize) -> SimulatedScene {
        SimulatedScene::new(&SensorConfig {
            simulated_bodies,
            ..Default::default()
        })
    }

    #[test]
    fn test_frames_are_deterministic() {
        let scene = scene(2);
        assert_eq!(scene.frame(123), scene.frame(123));
        assert_ne!(scene.frame(1).bodies, scene.frame(20).bodies);
    }

    #[test]
    fn test_bodies_occupy_spread_slots() {
        let scene = scene(2);
        let frame = scene.frame(0);
        assert_eq!(frame.bodies.len(), 6);
        assert_eq!(scene.slot_of(0), 0);
        assert_eq!(scene.slot_of(1), 3);
        assert!(frame.bodies[0].as_ref().is_some_and(|b| b.is_tracked));
        assert!(frame.bodies[3].as_ref().is_some_and(|b| b.is_tracked));
        assert!(frame.bodies[1].is_none());
    }

    #[test]
    fn test_secondary_body_leaves_and_returns() {
        let scene = scene(2);
        assert!(scene.body(1, 1.0).is_tracked);
        assert!(!scene.body(1, 9.0).is_tracked);
        assert!(scene.body(1, 11.0).is_tracked);
        // The primary body never leaves
        assert!(scene.body(0, 9.0).is_tracked);
    }

    #[test]
    fn test_occlusion_window() {
        let scene = scene(1);
        let clear = scene.body(0, 1.0);
        let occluded = scene.body(0, 2.5);

        assert!(clear
            .joints
            .iter()
            .all(|j| j.tracking_state == TrackingState::Tracked));
        assert_eq!(
            occluded.joints[JointType::FootLeft].tracking_state,
            TrackingState::Inferred
        );
        assert_eq!(
            occluded.joints[JointType::HandTipRight].tracking_state,
            TrackingState::NotTracked
        );
        assert_eq!(occluded.hand_right_state, HandState::NotTracked);
    }

    #[test]
    fn test_every_hand_state_appears() {
        let scene = scene(1);
        let mut seen = Vec::new();
        for second in 0..16 {
            let body = scene.body(0, second as f32 + 0.5);
            for state in [body.hand_left_state, body.hand_right_state] {
                if !seen.contains(&state) {
                    seen.push(state);
                }
            }
        }
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn test_degenerate_rates_do_not_panic() {
        for frame_rate in [1e-20, 0.0, f32::INFINITY, f32::NAN] {
            let scene = SimulatedScene::new(&SensorConfig {
                frame_rate,
                ..Default::default()
            });
            assert_eq!(scene.frame_period(), FALLBACK_FRAME_PERIOD);
            let _ = scene.relative_time(10);
        }
    }

    #[test]
    fn test_relative_time_follows_frame_rate() {
        let scene = scene(1);
        assert_eq!(scene.relative_time(0), Duration::ZERO);
        assert!((scene.relative_time(30).as_secs_f64() - 1.0).abs() < 1e-6);
        assert!(scene.relative_time(31) > scene.relative_time(30));
    }
}
