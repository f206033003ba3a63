//! Integration tests for server-granted roles and what they unlock.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tournament_tracker::{
    create_tournament, start_tournament, FixtureConfig, Role, RoleDirectory, TournamentError,
    TournamentType,
};
use uuid::Uuid;

#[test]
fn unlisted_users_are_players() {
    let roles = RoleDirectory::default();
    let id = Uuid::new_v4();

    assert_eq!(roles.role_of(id), Role::Player);
    assert_eq!(roles.actor(id).role, Role::Player);
}

#[test]
fn roles_come_from_configured_lists() {
    let (admin, master, both) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let roles = RoleDirectory::from_lists(
        &format!(" {}, not-an-id,,{} ", admin, both),
        &format!("{},{}", master, both),
    );

    assert_eq!(roles.role_of(admin), Role::Admin);
    assert_eq!(roles.role_of(master), Role::Master);
    assert_eq!(roles.role_of(both), Role::Master);
    assert_eq!(roles.role_of(Uuid::new_v4()), Role::Player);
    assert_eq!(roles.actor(admin).id, admin);
}

#[test]
fn only_configured_admins_manage_other_peoples_tournaments() {
    let mut rng = StdRng::seed_from_u64(21);
    let admin = Uuid::new_v4();
    let roles = RoleDirectory::new([admin], Vec::<Uuid>::new());

    let creator = roles.actor(Uuid::new_v4());
    let mut t = create_tournament("Cup", TournamentType::League, creator.id, false, &mut rng).unwrap();
    t.participants.push(Uuid::new_v4());

    let stranger = roles.actor(Uuid::new_v4());
    assert_eq!(
        start_tournament(&t, &stranger, &FixtureConfig::default(), &mut rng).unwrap_err(),
        TournamentError::UnauthorizedActor
    );
    assert!(start_tournament(&t, &roles.actor(admin), &FixtureConfig::default(), &mut rng).is_ok());
}
