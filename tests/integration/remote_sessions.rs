use std::sync::Arc;

use hacktheplanet::store::{FilesystemStore, MemoryStore};
use hacktheplanet::tree::FsNode;

use crate::support::Game;

const GIBSON: &str = "18.127.11.23";
const MICROSOFT: &str = "18.23.123.11";

fn connect_gibson(game: &mut Game) -> String {
    game.answer(&["admin", "god"]);
    game.run(&format!("ssh {}", GIBSON))
}

#[test]
fn ssh_to_unknown_address_changes_nothing() {
    let mut game = Game::logged_in();
    let out = game.run("ssh 10.0.0.99");
    assert_eq!(out, "ssh: connect to host 10.0.0.99 port 22: Connection refused");
    assert_eq!(game.sessions.depth(), 1);
    assert_eq!(game.current().name(), "localhost");
    assert_eq!(game.cwd(), "/home/neo");
    // no credentials were asked for
    assert!(game.console.prompts().is_empty());
}

#[test]
fn ssh_with_bad_credentials_stays_home() {
    let mut game = Game::logged_in();
    game.answer(&["admin", "letmein"]);
    assert_eq!(game.run(&format!("ssh {}", GIBSON)), "Invalid username or password");
    assert_eq!(game.sessions.depth(), 1);
    assert!(!game.network.host(1).in_ssh_session());
    assert!(game.network.host(1).active_user().is_none());
}

#[test]
fn ssh_then_exit_returns_to_caller() {
    let mut game = Game::logged_in();
    assert_eq!(
        connect_gibson(&mut game),
        "Connected to gibson (18.127.11.23)\nLogged in as admin!"
    );
    assert_eq!(game.current().name(), "gibson");
    assert_eq!(game.run("pwd"), "/home/admin");
    assert!(game.current().prompt().starts_with("admin@gibson:"));

    assert_eq!(game.run("exit"), "Connection to 18.127.11.23 closed.");
    assert_eq!(game.current().name(), "localhost");
    assert_eq!(game.cwd(), "/home/neo");

    let gibson = game.network.host(1);
    assert!(!gibson.in_ssh_session());
    assert!(!gibson.exit_requested());
    assert!(gibson.active_user().is_none());
    // local session untouched
    assert!(!game.player().exit_requested());
}

#[test]
fn ssh_to_self_or_open_session_is_refused() {
    let mut game = Game::logged_in();
    assert_eq!(
        game.run("ssh 127.0.0.1"),
        "ssh: 127.0.0.1: you are already on this host"
    );

    connect_gibson(&mut game);
    game.answer(&["root", "M$FT"]);
    game.run(&format!("ssh {}", MICROSOFT));
    assert_eq!(game.current().name(), "microsoft");
    assert_eq!(game.sessions.depth(), 3);

    assert_eq!(
        game.run(&format!("ssh {}", GIBSON)),
        "ssh: 18.127.11.23: a session to this host is already open"
    );

    game.run("exit");
    assert_eq!(game.current().name(), "gibson");
    game.run("exit");
    assert_eq!(game.current().name(), "localhost");
}

#[test]
fn ssh_aborted_by_end_of_input() {
    let mut game = Game::logged_in();
    assert_eq!(game.run(&format!("ssh {}", GIBSON)), "ssh: login aborted");
    assert_eq!(game.sessions.depth(), 1);
}

#[test]
fn download_outside_session_is_refused() {
    let mut game = Game::logged_in();
    game.run("echo x > a.txt");
    assert_eq!(
        game.run("download a.txt"),
        "download: only available during an ssh session"
    );
}

#[test]
fn download_copies_files_and_zips_directories() {
    let mut game = Game::logged_in();
    game.network
        .host_mut(1)
        .add_file_to_filesystem("/root/garbage", "worm.txt", FsNode::text("da Vinci"))
        .unwrap();
    game.network
        .host_mut(1)
        .add_file_to_filesystem("/root", "memo.txt", FsNode::text("Plague"))
        .unwrap();
    connect_gibson(&mut game);

    assert_eq!(
        game.run("download /root/memo.txt"),
        "Downloaded /root/memo.txt to /home/neo/Downloads/memo.txt"
    );
    assert_eq!(
        game.run("download /root/memo.txt"),
        "Downloaded /root/memo.txt to /home/neo/Downloads/memo_1.txt"
    );
    assert_eq!(
        game.run("download /root/garbage"),
        "Downloaded /root/garbage to /home/neo/Downloads/garbage.zip"
    );
    assert_eq!(
        game.run("download /root/nothing"),
        "download: nothing: No such file or directory"
    );

    game.run("exit");
    assert_eq!(game.run("cat ~/Downloads/memo_1.txt"), "Plague");
    assert_eq!(
        game.run("cat Downloads/garbage.zip"),
        "cat: Downloads/garbage.zip: is a zip archive, use unzip to extract it"
    );
    game.run("cd Downloads");
    assert_eq!(game.run("unzip garbage.zip"), "Extracted garbage.zip to /home/neo/Downloads/garbage");
    assert_eq!(game.run("cat garbage/worm.txt"), "da Vinci");

    // the remote original is untouched
    assert!(game.network.host(1).filesystem().get_node("/root/garbage/worm.txt").is_some());
}

#[test]
fn remote_changes_are_saved_by_the_remote_host() {
    let store = Arc::new(MemoryStore::new());
    let mut game = Game::on_store(store.clone());
    game.network.host_mut(0).create_user("neo", "pass1").unwrap();

    connect_gibson(&mut game);
    game.run("echo owned > /tmp/calling_card.txt");
    game.run("setpasswd hacked");
    game.run("exit");

    let saved = store.load("gibson").unwrap().unwrap();
    assert_eq!(
        saved.get_node("/tmp/calling_card.txt"),
        Some(&FsNode::text("owned"))
    );
    assert_eq!(saved.password(), "hacked");
    assert!(store
        .load("localhost")
        .unwrap()
        .unwrap()
        .get_node("/tmp/calling_card.txt")
        .is_none());

    game.answer(&["admin", "god"]);
    assert_eq!(game.run(&format!("ssh {}", GIBSON)), "Invalid username or password");
    game.answer(&["admin", "hacked"]);
    assert!(game.run(&format!("ssh {}", GIBSON)).contains("Logged in as admin!"));
}
