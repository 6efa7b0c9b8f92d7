//! World addressing, collision queries and voxel editing through the public API.

use cgmath::{Point3, Vector3};
use voxel_explorer::engine_state::{
    config::{EngineConfig, WorldConfig},
    voxels::{
        block::{block_type::BlockType, AIR},
        terrain::{EmptyTerrain, FlatTerrain, TerrainKind},
        voxel_handler::{cast_ray, EditMode, VoxelHandler},
        world::World,
    },
    EngineState,
};
use web_time::Duration;

fn config() -> WorldConfig {
    WorldConfig {
        chunk_size: 8,
        world_width: 3,
        world_height: 2,
        world_depth: 2,
        ..WorldConfig::default()
    }
}

fn world(height: i32) -> World {
    World::with_generator(
        &config(),
        EngineConfig::default().player.collision_box(),
        &FlatTerrain {
            height,
            material: BlockType::SAND,
        },
    )
}

#[test]
fn test_positions_outside_the_grid_are_air() {
    let world = world(16);
    let [w, h, d] = world.voxel_extent();
    let outside = [
        Point3::new(-0.01, 1.0, 1.0),
        Point3::new(1.0, -3.5, 1.0),
        Point3::new(1.0, 1.0, -100.0),
        Point3::new(w as f32, 1.0, 1.0),
        Point3::new(1.0, h as f32 + 0.5, 1.0),
        Point3::new(1.0, 1.0, d as f32 + 20.0),
    ];
    for position in outside {
        assert_eq!(world.get_voxel_id(position), AIR, "at {position:?}");
        assert!(!world.is_voxel_solid(position), "at {position:?}");
    }
    // The whole grid is solid, so only the outside reads as air.
    assert!(world.is_voxel_solid(Point3::new(0.0, 0.0, 0.0)));
    assert!(world.is_voxel_solid(Point3::new(w as f32 - 0.5, h as f32 - 0.5, d as f32 - 0.5)));
}

#[test]
fn test_chunk_buffers_map_back_to_world_positions() {
    let mut world = World::with_generator(
        &config(),
        EngineConfig::default().player.collision_box(),
        &EmptyTerrain,
    );
    let edits = [
        (Point3::new(0, 0, 0), BlockType::STONE),
        (Point3::new(7, 7, 7), BlockType::SNOW),
        (Point3::new(8, 0, 0), BlockType::GRASS),
        (Point3::new(23, 15, 15), BlockType::LEAVES),
        (Point3::new(12, 9, 3), BlockType::WOOD),
    ];
    for (voxel, block_type) in edits {
        assert!(world.set_voxel(voxel, block_type.id()));
    }

    let shape = *world.shape();
    let mut found = Vec::new();
    for chunk in world.chunks() {
        let origin = chunk.origin(&shape);
        for (local, id) in world.chunk_blocks(chunk.index).unwrap() {
            let voxel = Point3::new(
                origin.x + local.x as i32,
                origin.y + local.y as i32,
                origin.z + local.z as i32,
            );
            assert_eq!(world.get_voxel_id_at(voxel), id);
            found.push((voxel, BlockType::from_id(id).unwrap()));
        }
    }
    found.sort_by_key(|(voxel, _)| (voxel.x, voxel.y, voxel.z));
    let mut expected = edits.to_vec();
    expected.sort_by_key(|(voxel, _)| (voxel.x, voxel.y, voxel.z));
    assert_eq!(found, expected);
}

#[test]
fn test_collision_box_edges() {
    let world = world(4);
    // Resting exactly on the surface is not a collision.
    assert!(!world.check_collision(Point3::new(10.5, 4.0, 5.5)));
    // Any overlap with the top layer is.
    assert!(world.check_collision(Point3::new(10.5, 3.999, 5.5)));
    // Above the grid nothing is solid.
    assert!(!world.check_collision(Point3::new(10.5, 40.0, 5.5)));
    assert!(!world.check_collision_with(Point3::new(10.5, 4.0, 5.5), 2.5, 0.5));
}

#[test]
fn test_surface_height_of_empty_and_filled_columns() {
    let mut world = world(0);
    assert_eq!(world.find_surface_height(3, 3), 4);
    assert_eq!(world.find_surface_height(-5, 3), 4);

    world.set_voxel(Point3::new(3, 0, 3), BlockType::DIRT.id());
    assert_eq!(world.find_surface_height(3, 3), 1);
    world.set_voxel(Point3::new(3, 15, 3), BlockType::DIRT.id());
    assert_eq!(world.find_surface_height(3, 3), 16);
}

#[test]
fn test_edits_are_seen_by_the_next_collision_query() {
    let mut world = world(4);
    let position = Point3::new(10.5, 4.0, 5.5);
    assert!(world.is_on_ground(position));

    for x in 9..12 {
        for z in 4..7 {
            world.set_voxel(Point3::new(x, 3, z), AIR);
        }
    }
    assert!(!world.is_on_ground(position));

    world.set_voxel(Point3::new(10, 5, 5), BlockType::STONE.id());
    assert!(world.check_collision(position));
}

#[test]
fn test_edits_mark_chunks_for_remeshing() {
    let mut world = world(4);
    world.take_dirty_chunks();
    world.set_voxel(Point3::new(8, 3, 3), AIR);
    assert_eq!(world.take_dirty_chunks(), vec![0, 1]);
    world.set_voxel(Point3::new(-8, 3, 3), AIR);
    assert!(world.take_dirty_chunks().is_empty());
}

#[test]
fn test_voxel_handler_places_against_the_hit_face() {
    let mut world = world(4);
    world.set_voxel(Point3::new(14, 4, 5), BlockType::STONE.id());

    let eye = Point3::new(10.5, 4.5, 5.5);
    let hit = cast_ray(&world, eye, Vector3::unit_x(), 6.0).unwrap();
    assert_eq!(hit.voxel, Point3::new(14, 4, 5));

    let mut handler = VoxelHandler::new(&EngineConfig::default().interaction);
    handler.switch_mode();
    assert_eq!(handler.mode(), EditMode::Add);
    handler.set_new_voxel_id(BlockType::WOOD.id());
    handler.update(&world, eye, Vector3::unit_x());
    assert_eq!(handler.set_voxel(&mut world), Some(Point3::new(13, 4, 5)));
    assert_eq!(world.get_voxel_id_at(Point3::new(13, 4, 5)), BlockType::WOOD.id());
}

#[test]
fn test_engine_builds_from_json_config() {
    let config = EngineConfig::from_json_str(
        r#"{
            "world": {
                "chunk_size": 8,
                "world_width": 2,
                "world_height": 2,
                "world_depth": 2,
                "terrain": { "kind": "flat", "height": 5 }
            },
            "player": { "spawn": [4.5, 12.0, 4.5] }
        }"#,
    )
    .unwrap();
    assert_eq!(
        config.world.terrain,
        TerrainKind::Flat {
            height: 5,
            material: BlockType::STONE.id()
        }
    );

    let mut engine = EngineState::new(config).unwrap();
    assert_eq!(engine.player.feet_position(), Point3::new(4.5, 5.0, 4.5));
    for _ in 0..10 {
        engine.process_input(Duration::from_millis(16));
    }
    assert_eq!(engine.player.feet_position(), Point3::new(4.5, 5.0, 4.5));
    assert!(engine.player.is_grounded());
}
