// Integration tests for NPC arrival dialogue dispatched through the world.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tumbleweed::world::types::{default_aggressive_lines, default_friendly_lines};
use tumbleweed::world::{AccountLink, CharacterRecord, NpcRecord, Outbox, RoomRecord, World};

fn saloon_with(npc: NpcRecord) -> World {
    let mut world = World::new();
    world.insert_room(RoomRecord::new("street", "Main Street", "Dust.").with_exit("north", "saloon"));
    world.insert_room(RoomRecord::new("saloon", "the Saloon", "Sawdust.").with_exit("south", "street"));
    world.insert_npc(npc.with_location("saloon"));
    world.insert_character(
        CharacterRecord::new("dusty", "Dusty")
            .with_account(AccountLink::new("dusty"))
            .with_location("street"),
    );
    world
}

fn heard_by(out: &Outbox, id: &str) -> Vec<String> {
    out.for_recipient(id).into_iter().map(str::to_string).collect()
}

#[test]
fn friendly_npc_greets_arriving_player() {
    let mut world = saloon_with(NpcRecord::new("barkeep", "Barkeep"));
    let mut rng = StdRng::seed_from_u64(11);
    let mut out = Outbox::new();
    world
        .move_character("dusty", "saloon", &mut rng, &mut out)
        .unwrap();

    let heard = heard_by(&out, "dusty");
    assert_eq!(heard.len(), 1);
    let line = heard[0]
        .strip_prefix("Barkeep says, \"")
        .and_then(|s| s.strip_suffix('"'))
        .expect("say format");
    assert!(default_friendly_lines().iter().any(|l| l == line));

    let own = heard_by(&out, "barkeep");
    assert_eq!(own, vec![format!("You say, \"{}\"", line)]);
}

#[test]
fn hostile_npc_threatens_arriving_player() {
    let mut world = saloon_with(NpcRecord::new("outlaw", "Outlaw").hostile());
    let mut rng = StdRng::seed_from_u64(11);
    let mut out = Outbox::new();
    world
        .move_character("dusty", "saloon", &mut rng, &mut out)
        .unwrap();

    let heard = heard_by(&out, "dusty");
    assert_eq!(heard.len(), 1);
    assert!(default_aggressive_lines()
        .iter()
        .any(|l| heard[0] == format!("Outlaw says, \"{}\"", l)));
}

#[test]
fn empty_line_set_for_current_temperament_is_silent() {
    let npc = NpcRecord::new("outlaw", "Outlaw")
        .hostile()
        .with_aggressive_lines(Vec::new());
    let mut world = saloon_with(npc);
    let mut rng = StdRng::seed_from_u64(1);
    let mut out = Outbox::new();
    world
        .move_character("dusty", "saloon", &mut rng, &mut out)
        .unwrap();
    assert!(out.is_empty());
}

#[test]
fn non_player_arrivals_are_ignored() {
    let mut world = saloon_with(NpcRecord::new("barkeep", "Barkeep"));
    world.insert_character(CharacterRecord::new("mule", "a pack mule").with_location("street"));
    world.insert_npc(NpcRecord::new("drifter", "Drifter").with_location("street"));

    let mut rng = StdRng::seed_from_u64(1);
    let mut out = Outbox::new();
    world.move_character("mule", "saloon", &mut rng, &mut out).unwrap();
    world.move_npc("drifter", "saloon", &mut rng, &mut out).unwrap();
    assert!(out.is_empty());
}

#[test]
fn every_npc_in_the_room_reacts() {
    let mut world = saloon_with(NpcRecord::new("barkeep", "Barkeep"));
    world.insert_npc(NpcRecord::new("outlaw", "Outlaw").hostile().with_location("saloon"));
    let mut rng = StdRng::seed_from_u64(3);
    let mut out = Outbox::new();
    world
        .move_character("dusty", "saloon", &mut rng, &mut out)
        .unwrap();

    let heard = heard_by(&out, "dusty");
    assert_eq!(heard.len(), 2);
    assert!(heard.iter().any(|l| l.starts_with("Barkeep says")));
    assert!(heard.iter().any(|l| l.starts_with("Outlaw says")));
    // each NPC hears the other one too
    assert_eq!(heard_by(&out, "barkeep").len(), 2);
}

#[test]
fn line_choice_covers_the_whole_set() {
    let npc = NpcRecord::new("barkeep", "Barkeep");
    let player = CharacterRecord::new("dusty", "Dusty").with_account(AccountLink::new("dusty"));
    let mut rng = StdRng::seed_from_u64(99);
    let mut seen = std::collections::HashSet::new();
    for _ in 0..300 {
        seen.insert(npc.at_char_entered(&player, &mut rng).unwrap());
    }
    assert_eq!(seen.len(), npc.friendly_lines.len());
}
