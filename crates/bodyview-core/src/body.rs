//! Body model - joints, tracking states, hand states and the body slot buffer
//!
//! Bodies are delivered by the sensor as a fixed-size array of slots. A slot
//! is either empty or holds a complete [`Body`]; slots are replaced wholesale
//! on every frame and never partially mutated.

use std::ops::{Index, IndexMut};

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Skeletal landmark, in the sensor's canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum JointType {
    SpineBase,
    SpineMid,
    Neck,
    Head,
    ShoulderLeft,
    ElbowLeft,
    WristLeft,
    HandLeft,
    ShoulderRight,
    ElbowRight,
    WristRight,
    HandRight,
    HipLeft,
    KneeLeft,
    AnkleLeft,
    FootLeft,
    HipRight,
    KneeRight,
    AnkleRight,
    FootRight,
    SpineShoulder,
    HandTipLeft,
    ThumbLeft,
    HandTipRight,
    ThumbRight,
}

impl JointType {
    /// Number of joint types
    pub const COUNT: usize = 25;

    /// All joint types, indexed by [`JointType::index`]
    pub const ALL: [JointType; Self::COUNT] = [
        JointType::SpineBase,
        JointType::SpineMid,
        JointType::Neck,
        JointType::Head,
        JointType::ShoulderLeft,
        JointType::ElbowLeft,
        JointType::WristLeft,
        JointType::HandLeft,
        JointType::ShoulderRight,
        JointType::ElbowRight,
        JointType::WristRight,
        JointType::HandRight,
        JointType::HipLeft,
        JointType::KneeLeft,
        JointType::AnkleLeft,
        JointType::FootLeft,
        JointType::HipRight,
        JointType::KneeRight,
        JointType::AnkleRight,
        JointType::FootRight,
        JointType::SpineShoulder,
        JointType::HandTipLeft,
        JointType::ThumbLeft,
        JointType::HandTipRight,
        JointType::ThumbRight,
    ];

    /// Dense index of this joint type
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Confidence tier of a joint position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TrackingState {
    /// No data for this joint
    #[default]
    NotTracked,
    /// Estimated from surrounding joints, not observed
    Inferred,
    /// Directly observed
    Tracked,
}

/// Gesture classification of a hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HandState {
    /// Classifier has no opinion
    #[default]
    Unknown,
    /// Hand is not tracked
    NotTracked,
    /// Open palm
    Open,
    /// Closed fist
    Closed,
    /// Two fingers extended
    Lasso,
}

/// A single skeletal landmark with its camera-space position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joint {
    /// Which landmark this is
    pub joint_type: JointType,
    /// 3D camera-space position in meters
    pub position: Vec3,
    /// Confidence of the position
    pub tracking_state: TrackingState,
}

impl Joint {
    /// Create a joint
    pub fn new(joint_type: JointType, position: Vec3, tracking_state: TrackingState) -> Self {
        Self {
            joint_type,
            position,
            tracking_state,
        }
    }
}

/// All joints of a body, keyed by [`JointType`]
///
/// Always complete: a joint the sensor reported nothing for is
/// `NotTracked` at the camera origin.
#[derive(Debug, Clone, PartialEq)]
pub struct JointMap {
    joints: [Joint; JointType::COUNT],
}

impl JointMap {
    /// A map with every joint untracked at the origin
    pub fn untracked() -> Self {
        Self {
            joints: JointType::ALL.map(|t| Joint::new(t, Vec3::ZERO, TrackingState::NotTracked)),
        }
    }

    /// Set one joint's position and tracking state
    pub fn set(&mut self, joint_type: JointType, position: Vec3, tracking_state: TrackingState) {
        self.joints[joint_type.index()] = Joint::new(joint_type, position, tracking_state);
    }

    /// Iterate joints in canonical order
    pub fn iter(&self) -> impl Iterator<Item = &Joint> {
        self.joints.iter()
    }
}

impl Default for JointMap {
    fn default() -> Self {
        Self::untracked()
    }
}

impl Index<JointType> for JointMap {
    type Output = Joint;

    fn index(&self, joint_type: JointType) -> &Joint {
        &self.joints[joint_type.index()]
    }
}

impl IndexMut<JointType> for JointMap {
    fn index_mut(&mut self, joint_type: JointType) -> &mut Joint {
        &mut self.joints[joint_type.index()]
    }
}

/// One human skeleton as reported by the sensor
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Body {
    /// Whether the sensor is currently tracking this body
    pub is_tracked: bool,
    /// Sensor-assigned identifier, stable only while tracked
    pub tracking_id: u64,
    /// All joints
    pub joints: JointMap,
    /// Left hand gesture
    pub hand_left_state: HandState,
    /// Right hand gesture
    pub hand_right_state: HandState,
}

impl Body {
    /// Create a tracked body with the given joints and unknown hand states
    pub fn tracked(tracking_id: u64, joints: JointMap) -> Self {
        Self {
            is_tracked: true,
            tracking_id,
            joints,
            hand_left_state: HandState::Unknown,
            hand_right_state: HandState::Unknown,
        }
    }

    /// Set both hand states
    pub fn with_hands(mut self, left: HandState, right: HandState) -> Self {
        self.hand_left_state = left;
        self.hand_right_state = right;
        self
    }
}

/// Fixed-capacity buffer of body slots
///
/// The capacity equals the sensor's maximum number of simultaneously
/// trackable bodies and does not change for the lifetime of a connection.
#[derive(Debug, Clone, PartialEq)]
pub struct BodySlots {
    slots: Vec<Option<Body>>,
}

impl BodySlots {
    /// Create `capacity` empty slots
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    /// Number of slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// All slots, including empty ones
    pub fn slots(&self) -> &[Option<Body>] {
        &self.slots
    }

    /// Mutable access to the slots. The slot count cannot be changed through it.
    pub fn slots_mut(&mut self) -> &mut [Option<Body>] {
        &mut self.slots
    }

    /// Populated slots whose body is currently tracked
    pub fn tracked(&self) -> impl Iterator<Item = &Body> {
        self.slots.iter().flatten().filter(|b| b.is_tracked)
    }

    /// Number of tracked bodies
    pub fn tracked_count(&self) -> usize {
        self.tracked().count()
    }
}
