//! Tests for the SQLite player repository.

use std::collections::HashSet;

use ball_bingo::{
    FactConfig, GenerateError, GeneratorConfig, PuzzleGenerator, SubjectId, SubjectSource,
};
use ball_bingo_server::{ClubRecord, PlayerRecord, PlayerRepository, TitleRecord};
use tempfile::NamedTempFile;

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready repository.
fn setup_test_db(fact_config: FactConfig) -> (NamedTempFile, PlayerRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let repo = PlayerRepository::new(db_path, fact_config).expect("Failed to create repository");
    repo.run_migrations().expect("Migrations failed");
    (db_file, repo)
}

fn zidane() -> PlayerRecord {
    PlayerRecord::new(
        "Zinedine Zidane".to_string(),
        Some("France".to_string()),
        Some("Midfielder".to_string()),
    )
    .with_club(ClubRecord::new("Juventus".to_string(), Some(1996), Some(2001)))
    .with_club(ClubRecord::new("Real Madrid".to_string(), Some(2001), None))
    .with_title(TitleRecord::new("World Cup".to_string(), Some(1998)))
}

fn ronaldo() -> PlayerRecord {
    PlayerRecord::new(
        "Ronaldo".to_string(),
        Some("Brazil".to_string()),
        Some("Forward".to_string()),
    )
    .with_club(ClubRecord::new("Real Madrid".to_string(), Some(2002), Some(2007)))
    .with_title(TitleRecord::new("World Cup".to_string(), Some(2002)))
}

/// A player whose nationality appears nowhere else in the store.
fn distinctive(n: usize) -> PlayerRecord {
    PlayerRecord::new(
        format!("Star {n}"),
        Some(format!("Land {n}")),
        Some("Midfielder".to_string()),
    )
}

#[test]
fn test_migrations_are_idempotent() {
    let (_db, repo) = setup_test_db(FactConfig::default());
    let again = repo.run_migrations().expect("Second run failed");
    assert_eq!(again, 0);
    assert_eq!(repo.count_players().expect("Count failed"), 0);
}

#[test]
fn test_inserted_player_round_trips_with_career() {
    let (_db, repo) = setup_test_db(FactConfig::default());
    let id = repo.insert_player(&zidane()).expect("Insert failed");

    let subject = repo
        .fetch_subject(id)
        .expect("Query failed")
        .expect("Player should exist");

    assert_eq!(subject.name(), "Zinedine Zidane");
    assert_eq!(subject.nationality().as_deref(), Some("France"));
    let clubs: Vec<&str> = subject.clubs().iter().map(|c| c.club().as_str()).collect();
    assert_eq!(clubs, vec!["Juventus", "Real Madrid"]);
    assert_eq!(subject.titles().len(), 1);
}

#[test]
fn test_fetch_facts_renders_dated_facts_in_stored_order() {
    let (_db, repo) = setup_test_db(FactConfig::default());
    let id = repo.insert_player(&zidane()).expect("Insert failed");

    let facts = repo.fetch_facts(id).expect("Query failed");
    let facts: Vec<&str> = facts.iter().map(|f| f.as_str()).collect();

    assert_eq!(
        facts,
        vec![
            "Nationality: France",
            "Position: Midfielder",
            "Played for: Juventus (1996–2001)",
            "Played for: Real Madrid (since 2001)",
            "Won: World Cup (1998)",
        ]
    );
}

#[test]
fn test_plain_facts_drop_years() {
    let (_db, repo) = setup_test_db(FactConfig::plain());
    let id = repo.insert_player(&ronaldo()).expect("Insert failed");

    let facts = repo.fetch_facts(id).expect("Query failed");

    assert!(facts.iter().any(|f| f.as_str() == "Played for: Real Madrid"));
    assert!(facts.iter().any(|f| f.as_str() == "Won: World Cup"));
}

#[test]
fn test_clubs_and_titles_are_shared_by_name() {
    let (_db, repo) = setup_test_db(FactConfig::plain());
    let ids = repo.import(&[zidane(), ronaldo()]).expect("Import failed");
    assert_eq!(ids.len(), 2);

    for id in ids {
        let facts = repo.fetch_facts(id).expect("Query failed");
        assert!(facts.iter().any(|f| f.as_str() == "Played for: Real Madrid"));
        assert!(facts.iter().any(|f| f.as_str() == "Won: World Cup"));
    }
}

#[test]
fn test_unknown_player_has_no_facts() {
    let (_db, repo) = setup_test_db(FactConfig::default());
    let missing = SubjectId::from(999);

    assert!(repo.fetch_facts(missing).expect("Query failed").is_empty());
    assert!(repo.fetch_subject(missing).expect("Query failed").is_none());
}

#[test]
fn test_batched_facts_match_single_lookups() {
    let (_db, repo) = setup_test_db(FactConfig::default());
    let ids = repo.import(&[zidane(), ronaldo()]).expect("Import failed");
    let missing = SubjectId::from(999);
    let requested = [ids[1], missing, ids[0]];

    let batch = repo.fetch_facts_many(&requested).expect("Query failed");

    assert_eq!(batch.len(), 3);
    for ((id, facts), expected) in batch.iter().zip(requested) {
        assert_eq!(*id, expected);
        assert_eq!(*facts, repo.fetch_facts(expected).expect("Query failed"));
    }
    assert!(batch[1].1.is_empty());
    assert!(!batch[0].1.is_empty());
}

#[test]
fn test_blank_name_is_rejected() {
    let (_db, repo) = setup_test_db(FactConfig::default());
    let result = repo.insert_player(&PlayerRecord::new("  ".to_string(), None, None));
    assert!(result.is_err());
    assert_eq!(repo.count_players().expect("Count failed"), 0);
}

#[test]
fn test_random_subjects_are_distinct_and_bounded() {
    let (_db, repo) = setup_test_db(FactConfig::default());
    let records: Vec<PlayerRecord> = (1..=12).map(distinctive).collect();
    repo.import(&records).expect("Import failed");

    let some = repo.fetch_random_subjects(5).expect("Query failed");
    assert_eq!(some.len(), 5);
    let ids: HashSet<SubjectId> = some.iter().map(|s| *s.id()).collect();
    assert_eq!(ids.len(), 5);

    let all = repo.fetch_random_subjects(80).expect("Query failed");
    assert_eq!(all.len(), 12);
}

#[test]
fn test_generates_puzzle_from_database() {
    let (_db, repo) = setup_test_db(FactConfig::default());
    let records: Vec<PlayerRecord> = (1..=20).map(distinctive).collect();
    repo.import(&records).expect("Import failed");

    let puzzle = PuzzleGenerator::new(&repo, GeneratorConfig::default())
        .generate()
        .expect("Generation failed");

    assert_eq!(puzzle.cells().len(), 16);
    for cell in puzzle.cells() {
        let facts = repo.fetch_facts(*cell.solution()).expect("Query failed");
        assert!(facts.contains(cell.fact()));
    }
}

#[test]
fn test_small_database_is_insufficient() {
    let (_db, repo) = setup_test_db(FactConfig::default());
    let records: Vec<PlayerRecord> = (1..=5).map(distinctive).collect();
    repo.import(&records).expect("Import failed");

    let result = PuzzleGenerator::new(&repo, GeneratorConfig::default()).generate();

    assert!(matches!(
        result,
        Err(GenerateError::InsufficientData {
            available: 5,
            required: 16
        })
    ));
}
