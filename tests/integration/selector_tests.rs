//! End-to-end selection rounds: filtering, the connected-state gate,
//! evaluator ordering and seen-flag bookkeeping.

use wifi_selector::NetworkSelector;
use wifi_selector::app::events::SelectionEvent;
use wifi_selector::config::SelectorConfig;
use wifi_selector::gate::{Association, LinkState, SkipReason};
use wifi_selector::network::SecurityType;

use crate::mock_repo::{
    CollectingSink, OPEN, PSK, PickResolvable, RecordingRepository, World, connected_to, obs,
};

fn skipped(world: &World) -> Option<SkipReason> {
    match world.sink.last() {
        Some(SelectionEvent::RoundSkipped(reason)) => Some(*reason),
        _ => None,
    }
}

// ── Candidate filter ──────────────────────────────────────────

#[test]
fn blacklisted_and_weak_observations_never_connectable() {
    let mut world = World::new();
    let a = world.repo.add("a", SecurityType::Psk);
    let b = world.repo.add("b", SecurityType::Psk);
    let c = world.repo.add("c", SecurityType::Psk);
    let scan = [
        obs("a", 1, 2437, -86, PSK),
        obs("b", 2, 5180, -82, PSK),
        obs("c", 3, 5180, -40, PSK),
    ];
    world.blacklist.insert(scan[2].bssid());

    let chosen = world.disconnected_round(0, &scan).unwrap();
    assert_eq!(chosen.id, b);
    assert_eq!(world.connectable_ids(), [b]);
    assert!(!world.repo.seen(a));
    assert!(!world.repo.seen(c));
}

#[test]
fn empty_snapshot_returns_nothing() {
    let mut world = World::new();
    world.repo.add("a", SecurityType::Psk);
    assert!(world.disconnected_round(0, &[]).is_none());
    assert!(world.selector.connectable_scan_details().is_empty());
    assert_eq!(skipped(&world), Some(SkipReason::NoUsableObservations));
}

// ── Time hysteresis ───────────────────────────────────────────

#[test]
fn minimum_interval_blocks_reselection_while_connected() {
    let mut world = World::new();
    let test1 = world.repo.add("test1", SecurityType::Psk);
    let test2 = world.repo.add("test2", SecurityType::Psk);

    let first = [obs("test1", 1, 2437, -70, PSK), obs("test2", 2, 5180, -60, PSK)];
    assert_eq!(world.disconnected_round(0, &first).map(|n| n.id), Some(test2));

    // Link degraded below qualified, but only 5s have passed.
    let degraded = [obs("test1", 1, 5180, -50, PSK), obs("test2", 2, 5180, -80, PSK)];
    let here = connected_to(test2, 2, 5180, -80);
    assert!(world.round(5_000, &degraded, here, LinkState::Connected).is_none());
    assert_eq!(
        skipped(&world),
        Some(SkipReason::MinimumIntervalNotElapsed { elapsed_ms: 5_000 })
    );
    assert!(world.selector.connectable_scan_details().is_empty());

    // Past the interval the weak link is replaced.
    let chosen = world.round(15_000, &degraded, here, LinkState::Connected);
    assert_eq!(chosen.map(|n| n.id), Some(test1));
}

#[test]
fn disconnected_rounds_ignore_the_interval() {
    let mut world = World::new();
    let id = world.repo.add("test1", SecurityType::Psk);
    let scan = [obs("test1", 1, 2437, -70, PSK)];
    assert!(world.disconnected_round(0, &scan).is_some());
    assert_eq!(world.disconnected_round(1_000, &scan).map(|n| n.id), Some(id));
}

#[test]
fn rounds_without_candidate_still_start_the_interval() {
    let mut world = World::new();
    let test1 = world.repo.add("test1", SecurityType::Psk);
    let unknown = [obs("stranger", 9, 2437, -50, PSK)];
    assert!(world.disconnected_round(0, &unknown).is_none());
    assert_eq!(world.selector.state().last_selection_ms(), Some(0));

    let scan = [obs("test1", 1, 2437, -80, PSK)];
    let here = connected_to(test1, 1, 2437, -80);
    assert!(world.round(1_000, &scan, here, LinkState::Connected).is_none());
    assert_eq!(
        skipped(&world),
        Some(SkipReason::MinimumIntervalNotElapsed { elapsed_ms: 1_000 })
    );

    assert_eq!(
        world.round(11_000, &scan, here, LinkState::Connected).map(|n| n.id),
        Some(test1)
    );
}

// ── Presence gate ─────────────────────────────────────────────

#[test]
fn current_bssid_missing_from_scan_aborts() {
    let mut world = World::new();
    let test1 = world.repo.add("test1", SecurityType::Psk);
    let test2 = world.repo.add("test2", SecurityType::Psk);

    let scan = [obs("test1", 1, 2437, -70, PSK), obs("test2", 2, 5180, -60, PSK)];
    world.disconnected_round(0, &scan);
    assert_eq!(world.connectable_ids().len(), 2);

    let without_current = [obs("test2", 2, 5180, -60, PSK)];
    let here = connected_to(test1, 1, 2437, -84);
    assert!(world.round(60_000, &without_current, here, LinkState::Connected).is_none());
    assert_eq!(skipped(&world), Some(SkipReason::CurrentBssidNotInScan));
    assert!(world.selector.connectable_scan_details().is_empty());
    // Aborted rounds leave seen flags as they were.
    assert!(world.repo.seen(test1));
    assert!(world.repo.seen(test2));
}

// ── Sufficiency ───────────────────────────────────────────────

#[test]
fn qualified_5ghz_link_stays() {
    let mut world = World::new();
    let test1 = world.repo.add("test1", SecurityType::Psk);
    world.repo.add("test2", SecurityType::Psk);
    let scan = [obs("test1", 1, 5180, -60, PSK), obs("test2", 2, 5180, -40, PSK)];

    let here = connected_to(test1, 1, 5180, -60);
    assert!(world.round(0, &scan, here, LinkState::Connected).is_none());
    assert_eq!(skipped(&world), Some(SkipReason::CurrentNetworkSufficient));
}

#[test]
fn unqualified_5ghz_link_reselects() {
    let mut world = World::new();
    let test1 = world.repo.add("test1", SecurityType::Psk);
    let test2 = world.repo.add("test2", SecurityType::Psk);
    let scan = [obs("test1", 1, 5180, -75, PSK), obs("test2", 2, 5180, -50, PSK)];

    let here = connected_to(test1, 1, 5180, -75);
    assert_eq!(
        world.round(0, &scan, here, LinkState::Connected).map(|n| n.id),
        Some(test2)
    );
}

#[test]
fn strong_24ghz_link_reselects_when_5ghz_visible() {
    let mut world = World::new();
    let test1 = world.repo.add("test1", SecurityType::Psk);
    let test2 = world.repo.add("test2", SecurityType::Psk);
    let here = connected_to(test1, 1, 2437, -50);

    let only_24 = [obs("test1", 1, 2437, -50, PSK), obs("test2", 2, 2412, -40, PSK)];
    assert!(world.round(0, &only_24, here, LinkState::Connected).is_none());

    let with_5 = [obs("test1", 1, 2437, -50, PSK), obs("test2", 2, 5180, -55, PSK)];
    assert_eq!(
        world.round(0, &with_5, here, LinkState::Connected).map(|n| n.id),
        Some(test2)
    );
}

#[test]
fn open_network_is_never_sufficient() {
    let mut world = World::new();
    let cafe = world.repo.add("cafe", SecurityType::Open);
    let home = world.repo.add("home", SecurityType::Psk);
    let scan = [obs("cafe", 1, 5180, -40, OPEN), obs("home", 2, 5180, -60, PSK)];

    let here = connected_to(cafe, 1, 5180, -40);
    assert_eq!(
        world.round(0, &scan, here, LinkState::Connected).map(|n| n.id),
        Some(home)
    );
}

#[test]
fn transitioning_link_skips_round() {
    let mut world = World::new();
    world.repo.add("test1", SecurityType::Psk);
    let scan = [obs("test1", 1, 2437, -70, PSK)];
    assert!(world.round(0, &scan, Association::none(), LinkState::Transitioning).is_none());
    assert_eq!(skipped(&world), Some(SkipReason::LinkTransitioning));
}

#[test]
fn associated_selection_can_be_disabled() {
    let mut config = SelectorConfig::default();
    config.associated_selection_enabled = false;
    let mut world = World::with_config(config);
    let test1 = world.repo.add("test1", SecurityType::Psk);
    let scan = [obs("test1", 1, 2437, -84, PSK)];

    let here = connected_to(test1, 1, 2437, -84);
    assert!(world.round(0, &scan, here, LinkState::Connected).is_none());
    assert_eq!(skipped(&world), Some(SkipReason::AssociatedSelectionDisabled));
}

// ── Seen flags ────────────────────────────────────────────────

#[test]
fn seen_flags_track_only_the_latest_completed_round() {
    let mut world = World::new();
    let a = world.repo.add("a", SecurityType::Psk);
    let b = world.repo.add("b", SecurityType::Psk);

    world.disconnected_round(0, &[obs("a", 1, 2437, -60, PSK), obs("b", 2, 2437, -60, PSK)]);
    assert!(world.repo.seen(a) && world.repo.seen(b));

    world.disconnected_round(1_000, &[obs("a", 1, 2437, -60, PSK)]);
    assert!(world.repo.seen(a));
    assert!(!world.repo.seen(b));
}

#[test]
fn ephemeral_profiles_lose_stale_seen_flag() {
    let mut world = World::new();
    world.untrusted_allowed = true;
    let home = world.repo.add("home", SecurityType::Psk);

    let cafe = world
        .disconnected_round(0, &[obs("cafe", 1, 2437, -60, OPEN)])
        .unwrap();
    assert!(cafe.ephemeral);
    assert!(world.repo.seen(cafe.id));

    world.disconnected_round(1_000, &[obs("home", 2, 2437, -60, PSK)]);
    assert!(!world.repo.seen(cafe.id));

    // Saving the profile later must not pull it into the fan-out.
    assert_eq!(world.repo.add("cafe", SecurityType::Open), cafe.id);
    assert!(world.choose(home));
    assert_eq!(world.repo.choice_of(cafe.id), None);
}

// ── Registry ordering ─────────────────────────────────────────

#[test]
fn last_proposing_evaluator_wins() {
    let mut selector = NetworkSelector::new(SelectorConfig::default()).unwrap();
    selector
        .register_evaluator(
            Box::new(PickResolvable {
                name: "last",
                pick_last: true,
            }),
            1,
        )
        .unwrap();
    selector
        .register_evaluator(
            Box::new(PickResolvable {
                name: "first",
                pick_last: false,
            }),
            2,
        )
        .unwrap();

    let mut repo = RecordingRepository::new();
    let a = repo.add("a", SecurityType::Psk);
    repo.add("b", SecurityType::Psk);
    let scan = [obs("a", 1, 2437, -60, PSK), obs("b", 2, 2437, -60, PSK)];
    let blacklist = Default::default();
    let request = wifi_selector::SelectionRequest {
        scan: &scan,
        blacklist: &blacklist,
        association: Association::none(),
        link: LinkState::Disconnected,
        untrusted_allowed: false,
    };
    let clock = wifi_selector::adapters::clock::ManualClock::new(0);
    let mut sink = CollectingSink::new();

    let chosen = selector.select_network(&request, &mut repo, &clock, &mut sink);
    assert_eq!(chosen.map(|n| n.id), Some(a));
    // Both evaluators' pairs are kept.
    assert_eq!(selector.connectable_scan_details().len(), 4);
}

#[test]
fn saved_proposal_replaces_untrusted_one() {
    let mut world = World::new();
    world.untrusted_allowed = true;
    let home = world.repo.add("home", SecurityType::Psk);
    let scan = [obs("lobby", 1, 5180, -40, OPEN), obs("home", 2, 2437, -80, PSK)];

    assert_eq!(world.disconnected_round(0, &scan).map(|n| n.id), Some(home));
    assert_eq!(world.connectable_ids().len(), 2);
}

#[test]
fn untrusted_open_network_chosen_when_nothing_saved() {
    let mut world = World::new();
    world.untrusted_allowed = true;
    let scan = [obs("lobby", 1, 5180, -40, OPEN)];

    let chosen = world.disconnected_round(0, &scan).unwrap();
    assert!(chosen.ephemeral);
    assert_eq!(chosen.ssid.as_str(), "lobby");
}
