#![recursion_limit = "256"]
// tests/season_2018.rs
//
// A complete Power Up report: repeated ownership rows, vault powerups and
// the game data panel under the table.
//
mod common;

use common::{json, Columns, Report};
use fms_scrape::config::options::ParseConfig;
use serde_json::json;

fn report() -> Report {
    Report::new(Columns::BlueLabelRed)
        .row("Teams", "1678 • 254 • 971", "118 • 148 • 2056")
        .row("Auto-Run", "AutoRun • AutoRun • AutoRun", "AutoRun • None • AutoRun")
        .row("Auto-Run Points", "15", "10")
        .row("Switch / Scale Ownership Seconds", "8\n0", "0\n12")
        .row("Ownership Points", "20", "24")
        .row("Autonomous", "35", "34")
        .row("Switch / Scale Ownership Seconds", "60\n40", "25\n90")
        .row("Ownership Points", "100", "115")
        .row("Switch / Scale Boost Seconds", "10\n0", "0\n0")
        .row("Switch / Scale Force Seconds", "0\n10", "0\n0")
        .row("Force Powerup", "3, Played 3", "0")
        .row("Boost Powerup", "1, Not Played", "2, Played 2")
        .row("Levitate Powerup", "3, Played", "1")
        .row("Vault Points", "35", "15")
        .row("Endgame", "Levitate • Climbing • Climbing", "Climbing • Parking • None")
        .row("Endgame Points", "90", "35")
        .row("Teleop", "225", "165")
        .row("Fouls/Techs Committed", "0 • 0", "1 • 0")
        .row("Foul Points", "5", "0")
        .row("Final Score", "265", "199")
        .game_data(" LRL ")
}

#[test]
fn full_report_matches_expected_breakdown() {
    let out = report().parse(2018, &ParseConfig::default()).unwrap();
    let expected = json!({
        "alliances": {
            "blue": {"teams": ["frc1678", "frc254", "frc971"], "score": 265, "surrogates": [], "dqs": []},
            "red": {"teams": ["frc118", "frc148", "frc2056"], "score": 199, "surrogates": [], "dqs": []}
        },
        "score_breakdown": {
            "blue": {
                "adjustPoints": 0,
                "autoOwnershipPoints": 20,
                "autoPoints": 35,
                "autoQuestRankingPoint": true,
                "autoRobot1": "AutoRun",
                "autoRobot2": "AutoRun",
                "autoRobot3": "AutoRun",
                "autoRunPoints": 15,
                "autoScaleOwnershipSec": 0,
                "autoSwitchAtZero": true,
                "autoSwitchOwnershipSec": 8,
                "endgamePoints": 90,
                "endgameRobot1": "Levitate",
                "endgameRobot2": "Climbing",
                "endgameRobot3": "Climbing",
                "faceTheBossRankingPoint": true,
                "foulCount": 0,
                "foulPoints": 5,
                "rp": 4,
                "tba_gameData": "LRL",
                "techFoulCount": 0,
                "teleopOwnershipPoints": 100,
                "teleopPoints": 225,
                "teleopScaleBoostSec": 0,
                "teleopScaleForceSec": 10,
                "teleopScaleOwnershipSec": 40,
                "teleopSwitchBoostSec": 10,
                "teleopSwitchForceSec": 0,
                "teleopSwitchOwnershipSec": 60,
                "totalPoints": 265,
                "vaultBoostPlayed": 0,
                "vaultBoostTotal": 1,
                "vaultForcePlayed": 3,
                "vaultForceTotal": 3,
                "vaultLevitatePlayed": 3,
                "vaultLevitateTotal": 3,
                "vaultPoints": 35
            },
            "red": {
                "adjustPoints": 0,
                "autoOwnershipPoints": 24,
                "autoPoints": 34,
                "autoQuestRankingPoint": false,
                "autoRobot1": "AutoRun",
                "autoRobot2": "None",
                "autoRobot3": "AutoRun",
                "autoRunPoints": 10,
                "autoScaleOwnershipSec": 12,
                "autoSwitchAtZero": false,
                "autoSwitchOwnershipSec": 0,
                "endgamePoints": 35,
                "endgameRobot1": "Climbing",
                "endgameRobot2": "Parking",
                "endgameRobot3": "None",
                "faceTheBossRankingPoint": false,
                "foulCount": 1,
                "foulPoints": 0,
                "rp": 0,
                "tba_gameData": "LRL",
                "techFoulCount": 0,
                "teleopOwnershipPoints": 115,
                "teleopPoints": 165,
                "teleopScaleBoostSec": 0,
                "teleopScaleForceSec": 0,
                "teleopScaleOwnershipSec": 90,
                "teleopSwitchBoostSec": 0,
                "teleopSwitchForceSec": 0,
                "teleopSwitchOwnershipSec": 25,
                "totalPoints": 199,
                "vaultBoostPlayed": 2,
                "vaultBoostTotal": 2,
                "vaultForcePlayed": 0,
                "vaultForceTotal": 0,
                "vaultLevitatePlayed": 0,
                "vaultLevitateTotal": 1,
                "vaultPoints": 15
            }
        }
    });
    assert_eq!(json(&out), expected);
}

#[test]
fn zeroed_total_gives_negative_adjustment() {
    let html = report().html().replace("<td>199</td>", "<td>0</td>");
    let out = fms_scrape::parse_html(2018, &html, &ParseConfig::default()).unwrap();
    let v = json(&out);
    assert_eq!(v["score_breakdown"]["red"]["adjustPoints"], json!(-199));
    assert_eq!(v["alliances"]["red"]["score"], json!(0));
    // blue now wins by more, same rp
    assert_eq!(v["score_breakdown"]["blue"]["rp"], json!(4));
}

#[test]
fn playoffs_leave_out_auto_quest() {
    let out = report().parse(2018, &ParseConfig::playoff()).unwrap();
    let v = json(&out);
    for alliance in ["blue", "red"] {
        let sb = &v["score_breakdown"][alliance];
        assert!(sb.get("autoQuestRankingPoint").is_none());
        assert_eq!(sb["faceTheBossRankingPoint"], json!(false));
        assert_eq!(sb["rp"], json!(0));
    }
}

#[test]
fn disabled_bonuses_drop_out_of_rp() {
    let config = ParseConfig { enabled_extra_ranking_points: vec![false, false], ..ParseConfig::default() };
    let v = json(&report().parse(2018, &config).unwrap());
    assert_eq!(v["score_breakdown"]["blue"]["autoQuestRankingPoint"], json!(false));
    assert_eq!(v["score_breakdown"]["blue"]["faceTheBossRankingPoint"], json!(false));
    assert_eq!(v["score_breakdown"]["blue"]["rp"], json!(2));
}
