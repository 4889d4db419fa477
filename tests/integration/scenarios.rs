use std::sync::Arc;

use hacktheplanet::config::default_hosts;
use hacktheplanet::game_state::Mission;
use hacktheplanet::network::Network;
use hacktheplanet::shell::{ScriptedConsole, Shell};
use hacktheplanet::store::{FilesystemStore, MemoryStore};
use hacktheplanet::tree::FsNode;

fn boot(store: &Arc<MemoryStore>) -> (Shell, Network) {
    let shell = Shell::default();
    let store: Arc<dyn FilesystemStore> = store.clone();
    let network = Network::from_profiles(&default_hosts(), store, &shell.command_names()).unwrap();
    (shell, network)
}

#[test]
fn first_start_creates_account_and_exits() {
    let store = Arc::new(MemoryStore::new());
    let (shell, mut network) = boot(&store);
    let mut console = ScriptedConsole::new(["neo", "pass1", "pwd", "exit"]);

    shell.run(&mut network, &mut console).unwrap();

    let transcript = console.transcript();
    assert!(transcript.contains("Create a login for your terminal."));
    assert!(transcript.contains("Logged in as neo!"));
    assert!(transcript.contains("/home/neo"));
    assert!(transcript.ends_with("Quit out of terminal successfully!"));
    assert!(console
        .prompts()
        .contains(&"neo@localhost:/home/neo$ ".to_string()));

    let saved = store.load("localhost").unwrap().unwrap();
    assert_eq!(saved.password(), "pass1");
    assert!(saved.get_node("/home/neo/Desktop").unwrap().is_dir());
}

#[test]
fn invalid_username_asks_again() {
    let store = Arc::new(MemoryStore::new());
    let (shell, mut network) = boot(&store);
    let mut console = ScriptedConsole::new(["bad name", "x", "neo", "pass1", "exit"]);

    shell.run(&mut network, &mut console).unwrap();
    assert!(console
        .transcript()
        .contains("'bad name' is not a valid username"));
    assert_eq!(network.host(0).valid_users().len(), 1);
}

#[test]
fn returning_player_logs_in() {
    let store = Arc::new(MemoryStore::new());
    {
        let (shell, mut network) = boot(&store);
        let mut console = ScriptedConsole::new(["neo", "pass1", "touch Desktop/mark", "exit"]);
        shell.run(&mut network, &mut console).unwrap();
    }

    let (shell, mut network) = boot(&store);
    let mut console = ScriptedConsole::new(["neo", "wrong", "neo", "pass1", "ls Desktop"]);
    shell.run(&mut network, &mut console).unwrap();

    let transcript = console.transcript();
    assert!(transcript.contains("Login to localhost"));
    assert!(transcript.contains("Invalid username or password"));
    assert!(transcript.contains("Logged in as neo!"));
    assert!(transcript.contains("mark"));
    // end of input still says goodbye
    assert!(transcript.ends_with("Quit out of terminal successfully!"));
}

#[test]
fn end_of_input_inside_ssh_unwinds_every_session() {
    let store = Arc::new(MemoryStore::new());
    let (shell, mut network) = boot(&store);
    let mut console = ScriptedConsole::new([
        "neo",
        "pass1",
        "ssh 18.127.11.23",
        "admin",
        "god",
        "touch /tmp/was_here",
    ]);

    shell.run(&mut network, &mut console).unwrap();

    let gibson = network.host(1);
    assert!(!gibson.in_ssh_session());
    assert!(gibson.active_user().is_none());
    let saved = store.load("gibson").unwrap().unwrap();
    assert!(saved.get_node("/tmp/was_here").is_some());
    assert!(console
        .prompts()
        .contains(&"admin@gibson:/home/admin$ ".to_string()));
}

#[test]
fn mission_progress_is_tracked_on_the_player_host() {
    let store = Arc::new(MemoryStore::new());
    let (_shell, mut network) = boot(&store);
    let player = network.host_mut(0);
    player.create_user("neo", "pass1").unwrap();

    let mut mission = Mission::load("mission_1", player).unwrap();
    assert!(!mission.is_complete());
    assert!(!player.find("gibson_credentials", "/"));

    player
        .add_file_to_filesystem(
            "/home/neo/Downloads",
            "gibson_credentials.txt",
            FsNode::text("admin / god"),
        )
        .unwrap();
    if player.find("gibson_credentials", "/home/neo") {
        mission.succeed(player).unwrap();
    }
    assert!(player.is_mission_completed("mission_1"));

    // hidden from ordinary searches and listings
    assert!(!player.find("mission_1", "/"));

    let (_shell, network) = boot(&store);
    assert!(network.host(0).is_mission_completed("mission_1"));
}
