//! Shared fixtures for runtime integration tests.
#![allow(dead_code)]

use chimera_core::{Ability, Entity, EntityId, GameId, HybridSpec, Player, SkillEffect};
use chimera_runtime::{Repositories, Runtime, RuntimeHandle};

pub const ALICE: &str = "alice@example.com";
pub const BOB: &str = "bob@example.com";
pub const CAROL: &str = "carol@example.com";

pub fn alice() -> Player {
    Player::new(ALICE, "Alice")
}

pub fn bob() -> Player {
    Player::new(BOB, "Bob")
}

pub fn carol() -> Player {
    Player::new(CAROL, "Carol")
}

fn creature(id: u32, name: &str, stats: [i32; 5]) -> Entity {
    let [hit_points, attack, defense, agility, energy] = stats;
    Entity {
        id: EntityId(id),
        name: name.to_owned(),
        hit_points,
        attack,
        defense,
        agility,
        energy,
        vigor_cost: 1,
        ability: Ability {
            name: format!("{name} Call"),
            description: format!("The {name} calls out."),
            cost: 1,
            key: format!("{}_call", name.to_lowercase()),
            effect: SkillEffect::default(),
        },
    }
}

/// Small catalog: four strong creatures, four sturdy ones, four that fall
/// to a single blow.
pub fn catalog() -> Vec<Entity> {
    vec![
        creature(1, "Lion", [10, 6, 1, 4, 1]),
        creature(2, "Wolf", [10, 5, 1, 5, 1]),
        creature(3, "Bear", [12, 5, 2, 2, 1]),
        creature(4, "Eagle", [8, 4, 1, 6, 1]),
        creature(5, "Turtle", [14, 2, 4, 1, 1]),
        creature(6, "Cobra", [8, 5, 1, 5, 1]),
        creature(7, "Gnat", [1, 0, 0, 0, 0]),
        creature(8, "Moth", [1, 0, 0, 0, 0]),
        creature(9, "Flea", [1, 0, 0, 0, 0]),
        creature(10, "Mite", [1, 0, 0, 0, 0]),
        creature(11, "Rhino", [14, 4, 3, 2, 1]),
        creature(12, "Owl", [9, 3, 2, 4, 1]),
    ]
}

pub fn strong_specs() -> [HybridSpec; 2] {
    [HybridSpec::new([1, 2], 1), HybridSpec::new([3, 4], 3)]
}

pub fn sturdy_specs() -> [HybridSpec; 2] {
    [HybridSpec::new([5, 6], 5), HybridSpec::new([11, 12], 11)]
}

pub fn fragile_specs() -> [HybridSpec; 2] {
    [HybridSpec::new([7, 8], 7), HybridSpec::new([9, 10], 9)]
}

/// Runtime over fresh in-memory stores with the sweep worker disabled.
pub fn runtime() -> Runtime {
    runtime_with(Repositories::in_memory(catalog()))
}

pub fn runtime_with(repos: Repositories) -> Runtime {
    Runtime::builder()
        .repositories(repos)
        .enable_timeout_worker(false)
        .seed(7)
        .build()
}

/// Alice hosts, Bob joins; nobody has hybrids yet.
pub async fn lobby(handle: &RuntimeHandle) -> GameId {
    let game = handle
        .create_game("Arena", alice())
        .expect("create game");
    handle
        .join_game(&game.join_code, bob())
        .await
        .expect("bob joins");
    game.id
}

/// Lobby with hybrids created for both seats.
pub async fn ready(
    handle: &RuntimeHandle,
    alice_specs: [HybridSpec; 2],
    bob_specs: [HybridSpec; 2],
) -> GameId {
    let id = lobby(handle).await;
    handle
        .create_hybrids(id, ALICE, alice_specs)
        .await
        .expect("alice hybrids");
    handle
        .create_hybrids(id, BOB, bob_specs)
        .await
        .expect("bob hybrids");
    id
}

/// Ready game that finished its start job and sits in round 1 planning.
pub async fn started(
    handle: &RuntimeHandle,
    alice_specs: [HybridSpec; 2],
    bob_specs: [HybridSpec; 2],
) -> GameId {
    let id = ready(handle, alice_specs, bob_specs).await;
    handle
        .start_game(id)
        .await
        .expect("start accepted")
        .await
        .expect("start job");
    id
}
