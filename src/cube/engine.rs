//! Puzzle cube engine
//!
//! Holds the 27 cubelets, turns one layer at a time through a temporary
//! pivot, and re-derives integer grid slots when a turn lands. The host
//! calls [`CubeEngine::update`] once per frame and forwards pointer clicks
//! to [`CubeEngine::click`].

use glam::{Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::cubelet::{Axis, Cubelet, Face, GridCoord};
use super::picking::{Camera, Ray, Viewport, ray_box};
use super::transform::Transform;
use crate::consts::{CUBELET_SIZE, CUBELET_SPACING, QUARTER_TURN, TURN_SPEED};

/// A quarter turn of one layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerTurn {
    pub axis: Axis,
    /// Layer index along `axis` (-1, 0 or 1)
    pub layer: i8,
    /// +1 turns counter-clockwise about the positive axis, -1 clockwise
    pub direction: i8,
}

impl LayerTurn {
    pub fn new(axis: Axis, layer: i8, direction: i8) -> Self {
        Self {
            axis,
            layer: layer.clamp(-1, 1),
            direction: if direction >= 0 { 1 } else { -1 },
        }
    }

    pub fn reversed(self) -> Self {
        Self {
            direction: -self.direction,
            ..self
        }
    }
}

/// Result of a pointer ray against the cubelets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// Index into [`CubeEngine::cubelets`]
    pub index: usize,
    /// Face struck, in the cubelet's local frame
    pub face: Face,
    pub t: f32,
}

/// In-flight turn: the pivot owns `members` until the turn lands
#[derive(Debug, Clone)]
struct ActiveTurn {
    turn: LayerTurn,
    /// Pivot transform relative to the assembly
    pivot: Transform,
    members: Vec<usize>,
    turned: f32,
}

#[derive(Debug, Clone)]
pub struct CubeEngine {
    /// World transform of the whole puzzle
    pub assembly: Transform,
    cubelets: Vec<Cubelet>,
    active: Option<ActiveTurn>,
    /// Radians per second
    turn_speed: f32,
    spacing: f32,
}

impl Default for CubeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CubeEngine {
    pub fn new() -> Self {
        Self::with_turn_speed(TURN_SPEED)
    }

    pub fn with_turn_speed(turn_speed: f32) -> Self {
        let spacing = CUBELET_SPACING;
        let cubelets = GridCoord::all()
            .enumerate()
            .map(|(id, grid)| Cubelet::new(id, grid, spacing))
            .collect();
        Self {
            assembly: Transform::IDENTITY,
            cubelets,
            active: None,
            turn_speed: turn_speed.max(f32::EPSILON),
            spacing,
        }
    }

    pub fn cubelets(&self) -> &[Cubelet] {
        &self.cubelets
    }

    pub fn is_turning(&self) -> bool {
        self.active.is_some()
    }

    /// The turn currently animating, if any
    pub fn current_turn(&self) -> Option<LayerTurn> {
        self.active.as_ref().map(|a| a.turn)
    }

    pub fn grid_coords(&self) -> Vec<GridCoord> {
        self.cubelets.iter().map(|c| c.grid).collect()
    }

    /// Transform of a cubelet relative to the assembly, pivot included
    pub fn assembly_transform(&self, index: usize) -> Option<Transform> {
        let cubelet = self.cubelets.get(index)?;
        let local = match &self.active {
            Some(active) if active.members.contains(&index) => {
                active.pivot.mul_transform(&cubelet.local)
            }
            _ => cubelet.local,
        };
        Some(local)
    }

    /// World transform of a cubelet, for rendering. None for an unknown index.
    pub fn world_transform(&self, index: usize) -> Option<Transform> {
        self.assembly_transform(index)
            .map(|local| self.assembly.mul_transform(&local))
    }

    /// World transforms of every cubelet, in [`cubelets`](Self::cubelets) order
    pub fn world_transforms(&self) -> impl Iterator<Item = Transform> + '_ {
        (0..self.cubelets.len()).filter_map(|i| self.world_transform(i))
    }

    /// Resolve a pointer click into a layer turn and start it.
    ///
    /// Misses, internal faces and clicks while a turn is running are ignored.
    pub fn click(&mut self, x: f32, y: f32, camera: &Camera, viewport: Viewport) -> Option<LayerTurn> {
        if self.is_turning() {
            return None;
        }
        let ray = camera.ray_through(x, y, viewport);
        self.pick(&ray, camera.forward())
    }

    /// Same as [`click`](Self::click) for an already-built world ray
    pub fn pick(&mut self, ray: &Ray, view_dir: Vec3) -> Option<LayerTurn> {
        if self.is_turning() {
            return None;
        }
        let hit = self.raycast(ray)?;
        let turn = self.turn_for_face(hit.index, hit.face, view_dir)?;
        self.start_turn(turn).then_some(turn)
    }

    /// Nearest cubelet struck by a world ray
    pub fn raycast(&self, ray: &Ray) -> Option<PickHit> {
        let half = CUBELET_SIZE / 2.0;
        self.world_transforms()
            .enumerate()
            .filter_map(|(index, world)| {
                ray_box(ray, &world, half).map(|hit| PickHit {
                    index,
                    face: hit.face,
                    t: hit.t,
                })
            })
            .min_by(|a, b| a.t.total_cmp(&b.t))
    }

    /// Which turn a click on `face` of cubelet `index` asks for.
    ///
    /// The clicked face turns clockwise as seen along `view_dir`. Returns
    /// None when the face is internal.
    pub fn turn_for_face(&self, index: usize, face: Face, view_dir: Vec3) -> Option<LayerTurn> {
        let cubelet = self.cubelets.get(index)?;
        let normal = cubelet.local.transform_vector(face.normal());
        let (axis, sign) = Axis::dominant(normal);

        // Outward only: the piece must sit in the outer layer the face points out of
        if cubelet.grid.get(axis) != sign {
            return None;
        }

        let world_normal = self.assembly.transform_vector(normal);
        let facing = view_dir.dot(world_normal);
        let direction = if facing > 0.0 { sign } else { -sign };
        Some(LayerTurn::new(axis, sign, direction))
    }

    /// Begin animating a turn. Returns false if one is already running.
    pub fn start_turn(&mut self, turn: LayerTurn) -> bool {
        if self.is_turning() {
            return false;
        }

        let pivot = Transform::from_translation(turn.axis.unit() * turn.layer as f32 * self.spacing);
        let members: Vec<usize> = self
            .cubelets
            .iter()
            .enumerate()
            .filter(|(_, c)| c.grid.get(turn.axis) == turn.layer)
            .map(|(i, _)| i)
            .collect();
        if members.is_empty() {
            return false;
        }

        for &i in &members {
            let cubelet = &mut self.cubelets[i];
            cubelet.local = Transform::reparented(&cubelet.local, &pivot);
        }

        log::debug!(
            "Turning {:?} layer {} direction {} ({} pieces)",
            turn.axis,
            turn.layer,
            turn.direction,
            members.len()
        );
        self.active = Some(ActiveTurn {
            turn,
            pivot,
            members,
            turned: 0.0,
        });
        true
    }

    /// Advance the running turn by `dt` seconds. Returns the turn if it landed.
    pub fn update(&mut self, dt: f32) -> Option<LayerTurn> {
        let speed = self.turn_speed;
        let active = self.active.as_mut()?;

        let remaining = QUARTER_TURN - active.turned;
        active.turned += (speed * dt.max(0.0)).min(remaining);
        if active.turned + 1e-6 >= QUARTER_TURN {
            active.turned = QUARTER_TURN;
        }

        let angle = active.turn.direction as f32 * active.turned;
        active.pivot.rotation = Quat::from_axis_angle(active.turn.axis.unit(), angle);

        if active.turned >= QUARTER_TURN {
            return self.finish_turn();
        }
        None
    }

    /// Apply a full quarter turn without animation
    pub fn apply_turn(&mut self, turn: LayerTurn) -> bool {
        if !self.start_turn(turn) {
            return false;
        }
        let done = self.update(f32::MAX);
        done.is_some()
    }

    /// Apply `moves` random outer-layer turns
    pub fn scramble(&mut self, rng: &mut impl Rng, moves: usize) {
        for _ in 0..moves {
            let axis = Axis::ALL[rng.random_range(0..3)];
            let layer = if rng.random_bool(0.5) { 1 } else { -1 };
            let direction = if rng.random_bool(0.5) { 1 } else { -1 };
            self.apply_turn(LayerTurn::new(axis, layer, direction));
        }
    }

    /// Every side shows a single color
    pub fn is_solved(&self) -> bool {
        if self.is_turning() {
            return false;
        }
        Face::ALL.into_iter().all(|side| {
            let dir = side.normal();
            let mut colors = self
                .cubelets
                .iter()
                .filter(|c| c.grid.get(side.axis()) == side.sign())
                .map(|c| c.faces.get(c.face_pointing(dir)));
            match colors.next() {
                Some(first) => colors.all(|c| c == first),
                None => false,
            }
        })
    }

    fn finish_turn(&mut self) -> Option<LayerTurn> {
        let active = self.active.take()?;
        for &i in &active.members {
            let cubelet = &mut self.cubelets[i];
            // Back under the assembly, same world placement
            let mut local = active.pivot.mul_transform(&cubelet.local);
            let grid = GridCoord::from_position(local.translation, self.spacing);
            local.translation = grid.position(self.spacing);
            local.snap_rotation();
            cubelet.grid = grid;
            cubelet.local = local;
        }
        log::debug!("Turn complete: {:?}", active.turn);
        Some(active.turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::{HashMap, HashSet};

    const VIEWPORT: Viewport = Viewport {
        width: 800.0,
        height: 600.0,
    };

    fn assert_full_grid(engine: &CubeEngine) {
        let slots: HashSet<GridCoord> = engine.grid_coords().into_iter().collect();
        assert_eq!(slots.len(), 27);
        assert_eq!(slots, GridCoord::all().collect::<HashSet<_>>());
    }

    fn grid_by_id(engine: &CubeEngine) -> HashMap<usize, GridCoord> {
        engine.cubelets().iter().map(|c| (c.id, c.grid)).collect()
    }

    fn camera_facing(face: Face) -> Camera {
        let up = if face.axis() == Axis::Y { Vec3::Z } else { Vec3::Y };
        Camera::looking_at(face.normal() * 6.0, Vec3::ZERO, up)
    }

    fn run_to_completion(engine: &mut CubeEngine) -> Option<LayerTurn> {
        for _ in 0..1000 {
            if let Some(done) = engine.update(1.0 / 60.0) {
                return Some(done);
            }
        }
        None
    }

    #[test]
    fn test_new_cube() {
        let engine = CubeEngine::new();
        assert_eq!(engine.cubelets().len(), 27);
        assert_full_grid(&engine);
        assert!(engine.is_solved());
        assert!(!engine.is_turning());
    }

    #[test]
    fn test_click_each_face_center() {
        for face in Face::ALL {
            let mut engine = CubeEngine::new();
            let camera = camera_facing(face);
            let turn = engine
                .click(400.0, 300.0, &camera, VIEWPORT)
                .unwrap_or_else(|| panic!("click on {face:?} missed"));

            assert_eq!(turn.axis, face.axis(), "{face:?}");
            assert_eq!(turn.layer, face.sign(), "{face:?}");
            // Viewer in front of the face: clockwise as seen = negative about the outward normal
            assert_eq!(turn.direction, -face.sign(), "{face:?}");
            assert!(engine.is_turning());

            assert_eq!(run_to_completion(&mut engine), Some(turn));
            assert_full_grid(&engine);
            assert!(!engine.is_solved());
        }
    }

    #[test]
    fn test_front_face_turns_clockwise_on_screen() {
        let mut engine = CubeEngine::new();
        let camera = camera_facing(Face::PosZ);
        let top_right_front = engine
            .cubelets()
            .iter()
            .position(|c| c.grid == GridCoord::new(1, 1, 1))
            .expect("corner exists");

        engine.click(400.0, 300.0, &camera, VIEWPORT).expect("hit");
        run_to_completion(&mut engine);

        // Top-right swings down to bottom-right
        assert_eq!(engine.cubelets()[top_right_front].grid, GridCoord::new(1, -1, 1));
    }

    #[test]
    fn test_viewer_behind_face_flips_direction() {
        let engine = CubeEngine::new();
        let corner = engine
            .cubelets()
            .iter()
            .position(|c| c.grid == GridCoord::new(1, 1, 1))
            .expect("corner exists");
        for face in [Face::PosX, Face::PosY, Face::PosZ] {
            let front = engine.turn_for_face(corner, face, -face.normal()).expect("outward");
            let behind = engine.turn_for_face(corner, face, face.normal()).expect("outward");
            assert_eq!(front.direction, -behind.direction);
        }
    }

    #[test]
    fn test_click_miss_is_noop() {
        let mut engine = CubeEngine::new();
        let camera = camera_facing(Face::PosZ);
        assert!(engine.click(5.0, 5.0, &camera, VIEWPORT).is_none());
        assert!(!engine.is_turning());
        assert!(engine.is_solved());
    }

    #[test]
    fn test_internal_face_is_noop() {
        let mut engine = CubeEngine::new();
        // Ray travelling down the gap between the x=0 and x=1 columns, striking
        // the +X side of the (0, 0, 1) piece
        let gap_x = CUBELET_SPACING / 2.0;
        let ray = Ray::new(Vec3::new(gap_x, 0.0, CUBELET_SPACING), Vec3::NEG_X);
        let hit = engine.raycast(&ray).expect("hits a piece");
        assert_eq!(engine.cubelets()[hit.index].grid, GridCoord::new(0, 0, 1));
        assert_eq!(hit.face, Face::PosX);

        let before = grid_by_id(&engine);
        assert!(engine.pick(&ray, Vec3::NEG_X).is_none());
        assert!(!engine.is_turning());
        assert_eq!(grid_by_id(&engine), before);

        let center = engine
            .cubelets()
            .iter()
            .position(|c| c.grid == GridCoord::new(0, 0, 0))
            .expect("center exists");
        for face in Face::ALL {
            assert!(engine.turn_for_face(center, face, Vec3::NEG_Z).is_none());
        }
    }

    #[test]
    fn test_click_during_turn_is_ignored() {
        let mut engine = CubeEngine::new();
        let turn = engine
            .click(400.0, 300.0, &camera_facing(Face::PosX), VIEWPORT)
            .expect("hit");
        engine.update(0.1);
        let before = grid_by_id(&engine);

        assert!(engine.click(400.0, 300.0, &camera_facing(Face::PosY), VIEWPORT).is_none());
        assert!(!engine.start_turn(LayerTurn::new(Axis::Z, 1, 1)));
        assert_eq!(engine.current_turn(), Some(turn));
        assert_eq!(grid_by_id(&engine), before);
    }

    #[test]
    fn test_turn_animates_then_snaps() {
        let mut engine = CubeEngine::with_turn_speed(3.2);
        let turn = LayerTurn::new(Axis::Y, 1, 1);
        assert!(engine.start_turn(turn));

        // 0.25s covers less than half of the quarter turn
        assert!(engine.update(0.25).is_none());
        assert!(engine.is_turning());

        // An oversized step is clamped to the remaining angle
        assert_eq!(engine.update(10.0), Some(turn));
        assert!(!engine.is_turning());
        assert_full_grid(&engine);

        for (i, c) in engine.cubelets().iter().enumerate() {
            let world = engine.world_transform(i).expect("valid index");
            assert!((world.translation - c.grid.position(CUBELET_SPACING)).length() < 1e-6);
        }
    }

    #[test]
    fn test_transform_lookup_out_of_range() {
        let mut engine = CubeEngine::new();
        assert!(engine.world_transform(27).is_none());
        assert!(engine.assembly_transform(usize::MAX).is_none());
        engine.start_turn(LayerTurn::new(Axis::Y, 1, 1));
        assert!(engine.world_transform(27).is_none());
        assert_eq!(engine.world_transforms().count(), 27);
    }

    #[test]
    fn test_world_position_preserved_on_attach() {
        let mut engine = CubeEngine::new();
        let before: Vec<Vec3> = engine.world_transforms().map(|t| t.translation).collect();
        engine.start_turn(LayerTurn::new(Axis::X, -1, 1));
        for (i, pos) in before.iter().enumerate() {
            let now = engine.world_transform(i).expect("valid index");
            assert!((now.translation - *pos).length() < 1e-5);
        }
    }

    #[test]
    fn test_four_turns_restore_layer() {
        for axis in Axis::ALL {
            for layer in [-1, 1] {
                for direction in [-1, 1] {
                    let mut engine = CubeEngine::new();
                    let before = grid_by_id(&engine);
                    let turn = LayerTurn::new(axis, layer, direction);
                    for _ in 0..4 {
                        assert!(engine.start_turn(turn));
                        run_to_completion(&mut engine).expect("turn lands");
                    }
                    assert_eq!(grid_by_id(&engine), before);
                    assert!(engine.is_solved());
                }
            }
        }
    }

    #[test]
    fn test_turn_moves_only_its_layer() {
        let mut engine = CubeEngine::new();
        let before = grid_by_id(&engine);
        engine.apply_turn(LayerTurn::new(Axis::Z, -1, 1));
        for c in engine.cubelets() {
            if before[&c.id].z != -1 {
                assert_eq!(c.grid, before[&c.id]);
            } else {
                assert_eq!(c.grid.z, -1);
            }
        }
    }

    #[test]
    fn test_rotated_assembly_click() {
        // Assembly spun a quarter turn about Y: the world +Z side is the old -X side
        let mut engine = CubeEngine::new();
        engine.assembly = Transform::from_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        let turn = engine
            .click(400.0, 300.0, &camera_facing(Face::PosZ), VIEWPORT)
            .expect("hit");
        assert_eq!(turn.axis, Axis::X);
        assert_eq!(turn.layer, -1);
        run_to_completion(&mut engine);
        assert_full_grid(&engine);
    }

    #[test]
    fn test_scramble_and_undo() {
        let mut engine = CubeEngine::new();
        let mut rng = Pcg32::seed_from_u64(2024);
        let mut history = Vec::new();
        for _ in 0..25 {
            let axis = Axis::ALL[rng.random_range(0..3)];
            let turn = LayerTurn::new(axis, if rng.random_bool(0.5) { 1 } else { -1 }, 1);
            assert!(engine.apply_turn(turn));
            history.push(turn);
        }
        assert_full_grid(&engine);
        for turn in history.into_iter().rev() {
            engine.apply_turn(turn.reversed());
        }
        assert!(engine.is_solved());
    }

    proptest! {
        #[test]
        fn prop_turns_permute_slots(turns in proptest::collection::vec((0usize..3, -1i8..=1, any::<bool>()), 0..30)) {
            let mut engine = CubeEngine::new();
            for (axis, layer, ccw) in turns {
                let turn = LayerTurn::new(Axis::ALL[axis], layer, if ccw { 1 } else { -1 });
                prop_assert!(engine.apply_turn(turn));
                let slots: HashSet<GridCoord> = engine.grid_coords().into_iter().collect();
                prop_assert_eq!(slots.len(), 27);
            }
        }

        #[test]
        fn prop_scramble_keeps_grid(seed in any::<u64>(), moves in 0usize..40) {
            let mut engine = CubeEngine::new();
            let mut rng = Pcg32::seed_from_u64(seed);
            engine.scramble(&mut rng, moves);
            let slots: HashSet<GridCoord> = engine.grid_coords().into_iter().collect();
            prop_assert_eq!(slots, GridCoord::all().collect::<HashSet<_>>());
        }
    }
}
