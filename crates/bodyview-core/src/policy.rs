//! Skeleton render policy - what to draw for a tracked body, and how
//!
//! Bones follow a three-tier confidence rule:
//! - either endpoint `NotTracked`: nothing (the segment has no anchor)
//! - both endpoints `Inferred`: nothing (two guesses make a noisy bone)
//! - both endpoints `Tracked`: thick, high-confidence color
//! - one `Tracked`, one `Inferred`: thin, neutral gray
//!
//! The asymmetry between the last two tiers is intentional.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::body::{Body, HandState, JointType, TrackingState};
use crate::bone::BONES;
use crate::canvas::Canvas;
use crate::color::Color;
use crate::sensor::CoordinateMapper;

/// Colors and sizes used by the policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    /// Radius of every joint dot
    pub joint_radius: f32,
    /// Radius of the hand-state indicator
    pub hand_radius: f32,
    /// Width of a bone between two tracked joints
    pub tracked_bone_width: f32,
    /// Width of a bone between a tracked and an inferred joint
    pub inferred_bone_width: f32,
    /// Color of a bone between two tracked joints
    pub tracked_bone_color: Color,
    /// Color of a bone between a tracked and an inferred joint
    pub inferred_bone_color: Color,
    /// Color of a tracked joint
    pub tracked_joint_color: Color,
    /// Color of an inferred or untracked joint
    pub inferred_joint_color: Color,
    /// Indicator color for a closed hand
    pub hand_closed_color: Color,
    /// Indicator color for an open hand
    pub hand_open_color: Color,
    /// Indicator color for a lasso hand
    pub hand_lasso_color: Color,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            joint_radius: 5.0,
            hand_radius: 30.0,
            tracked_bone_width: 6.0,
            inferred_bone_width: 1.0,
            tracked_bone_color: Color::CORNFLOWER_BLUE,
            inferred_bone_color: Color::GRAY,
            tracked_joint_color: Color::BLUE,
            inferred_joint_color: Color::DARK_BLUE,
            hand_closed_color: Color::RED,
            hand_open_color: Color::GREEN,
            hand_lasso_color: Color::PURPLE,
        }
    }
}

/// How a single bone is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneStyle {
    /// Segment color
    pub color: Color,
    /// Segment width in pixels
    pub width: f32,
}

impl BoneStyle {
    /// Apply the confidence rule to a bone's endpoint states
    pub fn for_states(a: TrackingState, b: TrackingState, style: &RenderStyle) -> Option<Self> {
        use TrackingState::*;
        match (a, b) {
            (NotTracked, _) | (_, NotTracked) => None,
            (Inferred, Inferred) => None,
            (Tracked, Tracked) => Some(Self {
                color: style.tracked_bone_color,
                width: style.tracked_bone_width,
            }),
            _ => Some(Self {
                color: style.inferred_bone_color,
                width: style.inferred_bone_width,
            }),
        }
    }
}

/// Decides which bones, joints and hand indicators to draw for a body
#[derive(Debug, Clone, Default)]
pub struct SkeletonRenderPolicy {
    style: RenderStyle,
}

impl SkeletonRenderPolicy {
    /// Create a policy with the given style
    pub fn new(style: RenderStyle) -> Self {
        Self { style }
    }

    /// The active style
    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Indicator color for a hand state; `None` means no indicator
    pub fn hand_color(&self, state: HandState) -> Option<Color> {
        match state {
            HandState::Closed => Some(self.style.hand_closed_color),
            HandState::Open => Some(self.style.hand_open_color),
            HandState::Lasso => Some(self.style.hand_lasso_color),
            HandState::Unknown | HandState::NotTracked => None,
        }
    }

    /// Draw one body. Untracked bodies draw nothing.
    ///
    /// Joint positions are projected on every call; screen positions are
    /// never reused across frames.
    pub fn render_body<C: Canvas + ?Sized>(
        &self,
        body: &Body,
        mapper: &dyn CoordinateMapper,
        canvas: &mut C,
    ) {
        if !body.is_tracked {
            return;
        }

        let mut points = [Vec2::ZERO; JointType::COUNT];
        for joint in body.joints.iter() {
            points[joint.joint_type.index()] =
                mapper.map_camera_point_to_depth_space(joint.position);
        }
        let point = |t: JointType| points[t.index()];

        for bone in BONES.iter() {
            let from = &body.joints[bone.from];
            let to = &body.joints[bone.to];
            let Some(bone_style) =
                BoneStyle::for_states(from.tracking_state, to.tracking_state, &self.style)
            else {
                continue;
            };

            let (start, end) = (point(bone.from), point(bone.to));
            if start.is_finite() && end.is_finite() {
                canvas.draw_line(start, end, bone_style.color, bone_style.width);
            }
        }

        for joint in body.joints.iter() {
            let center = point(joint.joint_type);
            if !center.is_finite() {
                continue;
            }
            let color = if joint.tracking_state == TrackingState::Tracked {
                self.style.tracked_joint_color
            } else {
                self.style.inferred_joint_color
            };
            canvas.draw_circle(center, self.style.joint_radius, color);
        }

        self.render_hand(body.hand_left_state, point(JointType::HandLeft), canvas);
        self.render_hand(body.hand_right_state, point(JointType::HandRight), canvas);
    }

    fn render_hand<C: Canvas + ?Sized>(&self, state: HandState, position: Vec2, canvas: &mut C) {
        if let Some(color) = self.hand_color(state) {
            if position.is_finite() {
                canvas.draw_circle(position, self.style.hand_radius, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::JointMap;
    use crate::canvas::{DrawCommand, DrawList};
    use glam::Vec3;

    /// Maps camera X/Y straight to screen pixels
    struct FlatMapper;

    impl CoordinateMapper for FlatMapper {
        fn map_camera_point_to_depth_space(&self, point: Vec3) -> Vec2 {
            if point.z <= 0.0 {
                return Vec2::splat(f32::NEG_INFINITY);
            }
            Vec2::new(point.x, point.y)
        }
    }

    fn body_with_all(state: TrackingState) -> Body {
        let mut joints = JointMap::default();
        for (i, joint_type) in JointType::ALL.iter().enumerate() {
            joints.set(*joint_type, Vec3::new(i as f32 * 10.0, 5.0, 2.0), state);
        }
        Body::tracked(1, joints)
    }

    #[test]
    fn test_bone_rule_tiers() {
        use TrackingState::*;
        let style = RenderStyle::default();

        assert_eq!(BoneStyle::for_states(NotTracked, Tracked, &style), None);
        assert_eq!(BoneStyle::for_states(Tracked, NotTracked, &style), None);
        assert_eq!(BoneStyle::for_states(Inferred, Inferred, &style), None);

        let thick = BoneStyle::for_states(Tracked, Tracked, &style).unwrap();
        assert_eq!(thick.color, Color::CORNFLOWER_BLUE);
        assert_eq!(thick.width, 6.0);

        for (a, b) in [(Tracked, Inferred), (Inferred, Tracked)] {
            let thin = BoneStyle::for_states(a, b, &style).unwrap();
            assert_eq!(thin.color, Color::GRAY);
            assert_eq!(thin.width, 1.0);
        }
    }

    #[test]
    fn test_untracked_body_draws_nothing() {
        let mut body = body_with_all(TrackingState::Tracked);
        body.is_tracked = false;
        let mut list = DrawList::new();

        SkeletonRenderPolicy::default().render_body(&body, &FlatMapper, &mut list);
        assert!(list.is_empty());
    }

    #[test]
    fn test_fully_tracked_body() {
        let body = body_with_all(TrackingState::Tracked);
        let mut list = DrawList::new();

        SkeletonRenderPolicy::default().render_body(&body, &FlatMapper, &mut list);

        assert_eq!(list.line_count(), BONES.len());
        assert_eq!(list.circle_count(), JointType::COUNT);
        assert!(list.commands().iter().all(|c| match c {
            DrawCommand::Circle { color, .. } => *color == Color::BLUE,
            DrawCommand::Line { width, .. } => *width == 6.0,
            _ => false,
        }));
    }

    #[test]
    fn test_inferred_joints_are_dimmer() {
        let body = body_with_all(TrackingState::Inferred);
        let mut list = DrawList::new();

        SkeletonRenderPolicy::default().render_body(&body, &FlatMapper, &mut list);

        assert_eq!(list.line_count(), 0);
        assert_eq!(list.circle_count(), JointType::COUNT);
        assert!(list.commands().iter().all(|c| matches!(
            c,
            DrawCommand::Circle { color, .. } if *color == Color::DARK_BLUE
        )));
    }

    #[test]
    fn test_hand_indicators() {
        let cases = [
            (HandState::Closed, Some(Color::RED)),
            (HandState::Open, Some(Color::GREEN)),
            (HandState::Lasso, Some(Color::PURPLE)),
            (HandState::Unknown, None),
            (HandState::NotTracked, None),
        ];
        let policy = SkeletonRenderPolicy::default();

        for (state, expected) in cases {
            let body = body_with_all(TrackingState::Tracked).with_hands(state, HandState::Unknown);
            let mut list = DrawList::new();
            policy.render_body(&body, &FlatMapper, &mut list);

            let hands: Vec<Color> = list
                .commands()
                .iter()
                .filter_map(|c| match c {
                    DrawCommand::Circle { radius, color, .. } if *radius == 30.0 => Some(*color),
                    _ => None,
                })
                .collect();
            assert_eq!(hands, expected.into_iter().collect::<Vec<_>>(), "{:?}", state);
        }
    }

    #[test]
    fn test_unprojectable_joints_are_skipped() {
        let mut body = body_with_all(TrackingState::Tracked);
        body.joints.set(JointType::Head, Vec3::new(0.0, 0.0, -1.0), TrackingState::Tracked);
        let mut list = DrawList::new();

        SkeletonRenderPolicy::default().render_body(&body, &FlatMapper, &mut list);

        assert_eq!(list.line_count(), BONES.len() - 1);
        assert_eq!(list.circle_count(), JointType::COUNT - 1);
    }
}
