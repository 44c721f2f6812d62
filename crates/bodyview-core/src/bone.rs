//! Bone catalog - the fixed connectivity of the skeleton

use crate::body::JointType;

/// Anatomical group a bone belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum BoneGroup {
    Torso,
    RightArm,
    LeftArm,
    RightLeg,
    LeftLeg,
}

/// A named connection between two joint types, used only for drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bone {
    /// First endpoint
    pub from: JointType,
    /// Second endpoint
    pub to: JointType,
    /// Group the bone belongs to
    pub group: BoneGroup,
}

const fn bone(from: JointType, to: JointType, group: BoneGroup) -> Bone {
    Bone { from, to, group }
}

/// Every bone of the skeleton, in drawing order
pub const BONES: [Bone; 24] = {
    use BoneGroup::*;
    use JointType::*;
    [
        // Torso
        bone(Head, Neck, Torso),
        bone(Neck, SpineShoulder, Torso),
        bone(SpineShoulder, SpineMid, Torso),
        bone(SpineMid, SpineBase, Torso),
        bone(SpineShoulder, ShoulderRight, Torso),
        bone(SpineShoulder, ShoulderLeft, Torso),
        bone(SpineBase, HipRight, Torso),
        bone(SpineBase, HipLeft, Torso),
        // Right arm
        bone(ShoulderRight, ElbowRight, RightArm),
        bone(ElbowRight, WristRight, RightArm),
        bone(WristRight, HandRight, RightArm),
        bone(HandRight, HandTipRight, RightArm),
        bone(WristRight, ThumbRight, RightArm),
        // Left arm
        bone(ShoulderLeft, ElbowLeft, LeftArm),
        bone(ElbowLeft, WristLeft, LeftArm),
        bone(WristLeft, HandLeft, LeftArm),
        bone(HandLeft, HandTipLeft, LeftArm),
        bone(WristLeft, ThumbLeft, LeftArm),
        // Right leg
        bone(HipRight, KneeRight, RightLeg),
        bone(KneeRight, AnkleRight, RightLeg),
        bone(AnkleRight, FootRight, RightLeg),
        // Left leg
        bone(HipLeft, KneeLeft, LeftLeg),
        bone(KneeLeft, AnkleLeft, LeftLeg),
        bone(AnkleLeft, FootLeft, LeftLeg),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_group_sizes() {
        let count = |g: BoneGroup| BONES.iter().filter(|b| b.group == g).count();
        assert_eq!(count(BoneGroup::Torso), 8);
        assert_eq!(count(BoneGroup::RightArm), 5);
        assert_eq!(count(BoneGroup::LeftArm), 5);
        assert_eq!(count(BoneGroup::RightLeg), 3);
        assert_eq!(count(BoneGroup::LeftLeg), 3);
    }

    #[test]
    fn test_every_joint_is_connected() {
        let connected: HashSet<JointType> =
            BONES.iter().flat_map(|b| [b.from, b.to]).collect();
        assert_eq!(connected.len(), JointType::COUNT);
    }

    #[test]
    fn test_no_duplicate_bones() {
        let unique: HashSet<(JointType, JointType)> =
            BONES.iter().map(|b| (b.from, b.to)).collect();
        assert_eq!(unique.len(), BONES.len());
    }
}
