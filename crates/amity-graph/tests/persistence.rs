//! Save → load round trips through real files.

use amity_graph::io::{load_files, save_files};
use amity_graph::SocialGraph;

fn sample_graph() -> SocialGraph {
    let mut g = SocialGraph::new();
    for (id, tags) in [
        (1, vec!["music", "chess"]),
        (2, vec!["music"]),
        (3, vec![]),
        (4, vec!["hiking", "chess"]),
        (5, vec!["music"]),
    ] {
        g.add_user(id, tags);
    }
    for (a, b) in [(1, 2), (2, 3), (3, 4), (4, 1), (2, 5)] {
        g.add_friendship(a, b).unwrap();
    }
    g
}

#[test]
fn round_trip_preserves_friendships_and_tags() {
    let dir = tempfile::tempdir().unwrap();
    let edges = dir.path().join("edges.txt");
    let tags = dir.path().join("tags.txt");

    let original = sample_graph();
    let saved = save_files(&original, &edges, &tags);
    assert!(saved.is_ok());
    assert_eq!(*saved.edges.as_ref().unwrap(), 5);
    assert_eq!(*saved.tags.as_ref().unwrap(), 4);

    let mut reloaded = SocialGraph::new();
    let loaded = load_files(&mut reloaded, &edges, &tags);
    assert!(loaded.is_ok());
    assert_eq!(loaded.edges.as_ref().unwrap().skipped, 0);

    let before: Vec<_> = original.friendships().collect();
    let after: Vec<_> = reloaded.friendships().collect();
    assert_eq!(before, after);
    for id in original.all_users() {
        assert_eq!(original.tags_of(*id), reloaded.tags_of(*id), "tags of {id}");
    }
    assert_eq!(original.all_users(), reloaded.all_users());
}

#[test]
fn saved_edge_file_lists_each_friendship_once() {
    let dir = tempfile::tempdir().unwrap();
    let edges = dir.path().join("edges.txt");
    let tags = dir.path().join("tags.txt");

    save_files(&sample_graph(), &edges, &tags);
    let text = std::fs::read_to_string(&edges).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, vec!["1 2", "1 4", "2 3", "2 5", "3 4"]);
}

#[test]
fn isolated_untagged_user_is_not_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let edges = dir.path().join("edges.txt");
    let tags = dir.path().join("tags.txt");

    let mut g = SocialGraph::new();
    g.add_user(10, Vec::<String>::new());
    save_files(&g, &edges, &tags);

    let mut reloaded = SocialGraph::new();
    load_files(&mut reloaded, &edges, &tags);
    assert!(!reloaded.user_exists(10));
}
