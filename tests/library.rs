mod util;
use std::fs;

use chartbook::book::{Direction, Theme};
use chartbook::book::{LineKind, SectionLine};
use chartbook::library_cmd::{SectionCmd, SetlistCmd, SongCmd};
use chartbook::music::Accidentals;
use chartbook::project::read_json;
use chartbook::render::ViewKind;
pub use util::*;

fn new_song(build: &Builder, title: &str, key: &str) {
    let cmd = SongCmd::New {
        title: title.into(),
        artist: None,
        key: Some(key.into()),
    };
    chartbook::chartbook_song_at(&build.app, &build.dir, cmd).unwrap();
}

fn song(build: &Builder, cmd: SongCmd) {
    chartbook::chartbook_song_at(&build.app, &build.dir, cmd).unwrap();
}

fn section(build: &Builder, cmd: SectionCmd) {
    song(build, SongCmd::Section(cmd));
}

fn setlist(build: &Builder, cmd: SetlistCmd) -> String {
    chartbook::chartbook_setlist_at(&build.app, &build.dir, cmd).unwrap()
}

#[test]
fn songs_and_search() {
    let build = Builder::init_and_build("library-songs").unwrap();
    let cmd = SongCmd::New {
        title: "Be Thou My Vision".into(),
        artist: Some("Irish hymn".into()),
        key: Some("Eb".into()),
    };
    chartbook::chartbook_song_at(&build.app, &build.dir, cmd).unwrap();

    let all = chartbook::chartbook_songs_at(&build.app, &build.dir, "").unwrap();
    assert_eq!(
        all,
        "Be Thou My Vision - Irish hymn [Eb]\nAmazing Grace (Demo) - Traditional [G]\n"
    );

    let found = chartbook::chartbook_songs_at(&build.app, &build.dir, "  WRETCH ").unwrap();
    assert_eq!(found, "Amazing Grace (Demo) - Traditional [G]\n");
    let none = chartbook::chartbook_songs_at(&build.app, &build.dir, "xyzzy").unwrap();
    assert_eq!(none, "");

    let cmd = SongCmd::Remove {
        song: "be thou my vision".into(),
    };
    chartbook::chartbook_song_at(&build.app, &build.dir, cmd).unwrap();
    let cmd = SongCmd::Remove {
        song: "be thou my vision".into(),
    };
    let err = chartbook::chartbook_song_at(&build.app, &build.dir, cmd).unwrap_err();
    assert_eq!(err.to_string(), "No song matching 'be thou my vision'");
}

#[test]
fn show_song() {
    let build = Builder::init_and_build("library-show").unwrap();
    let show = |steps, accidentals, view| {
        chartbook::chartbook_show_at(&build.app, &build.dir, "amazing grace (demo)", steps, accidentals, view)
            .unwrap()
    };

    let chart = show(0, None, ViewKind::Chords);
    assert!(chart.contains("Key: G\n"));
    assert!(chart.contains("| G - D/F# - Em - D - C - Am - D |"));

    let chart = show(-1, Some(Accidentals::Flats), ViewKind::Mixed);
    assert!(chart.contains("Key: Gb (written in G, -1)"));
    assert!(chart.contains("| Gb - Db/F - Ebm - Db - B - Abm - Db |\nAmazing grace"));

    let chart = show(-1, None, ViewKind::Lyrics);
    assert!(chart.contains("Key: F# (written in G, -1)"));
    assert!(!chart.contains("| "));

    let err = chartbook::chartbook_show_at(&build.app, &build.dir, "nope", 0, None, ViewKind::Mixed)
        .unwrap_err();
    assert_eq!(err.to_string(), "No song matching 'nope'");
}

#[test]
fn setlist_editing() {
    let build = Builder::init_and_build("library-setlist").unwrap();
    new_song(&build, "Second", "D");
    new_song(&build, "Third", "E");

    setlist(&build, SetlistCmd::New { name: "Sunday".into() });
    for song in ["Amazing Grace (Demo)", "second", "third"].iter() {
        setlist(
            &build,
            SetlistCmd::Add {
                setlist: "sunday".into(),
                song: song.to_string(),
            },
        );
    }
    setlist(
        &build,
        SetlistCmd::Move {
            setlist: "Sunday".into(),
            index: 3,
            direction: Direction::Up,
        },
    );
    setlist(
        &build,
        SetlistCmd::Transpose {
            setlist: "Sunday".into(),
            index: 1,
            delta: -2,
        },
    );
    setlist(
        &build,
        SetlistCmd::Remove {
            setlist: "Sunday".into(),
            index: 3,
        },
    );

    let list = setlist(&build, SetlistCmd::List);
    assert_eq!(list, "Sunday (2 songs)\nDemo (1 songs)\n");

    let shown = setlist(
        &build,
        SetlistCmd::Show {
            setlist: "Sunday".into(),
            view: ViewKind::Chords,
        },
    );
    let expected = indoc!(
        "
        Chart Book: Sunday
        ==================

        1. Amazing Grace (Demo) (Traditional)
        -------------------------------------
        Key: F (written in G, -2)

        INTRO
        | F - Dm - C - A# |

        VERSE
        | F - C/E - Dm - C - A# - Gm - C |

        CHORUS
        | F - Dm - Gm - A# |

        2. Third
        --------
        Key: E

        INTRO
        | C - F - G - C |
        "
    );
    assert_eq!(shown, expected);

    let err = chartbook::chartbook_setlist_at(
        &build.app,
        &build.dir,
        SetlistCmd::Remove {
            setlist: "Sunday".into(),
            index: 5,
        },
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Setlist 'Sunday' has no item number 5");

    let build = build.rebuild().unwrap();
    let sunday = build.project.library.find_setlist("Sunday").unwrap();
    let transpose: Vec<_> = sunday.items.iter().map(|item| item.transpose).collect();
    assert_eq!(transpose, [-2, 0]);
}

#[test]
fn missing_setlist_output() {
    let build = Builder::init_and_build("library-missing-setlist").unwrap();
    setlist(&build, SetlistCmd::Delete { setlist: "Demo".into() });

    let err = chartbook::chartbook_make_at(&build.app, &build.dir).unwrap_err();
    let msg = format!("{:#}", err);
    assert!(msg.contains("demo-setlist.txt"), "{}", msg);
    assert!(msg.contains("No setlist matching 'Demo'"), "{}", msg);
}

#[test]
fn prefs() {
    let build = Builder::init_and_build("library-prefs").unwrap();

    let shown = chartbook::chartbook_prefs_at(&build.app, &build.dir, None, None).unwrap();
    assert_eq!(shown, "accidentals = sharps\ntheme = system\n");

    let shown = chartbook::chartbook_prefs_at(
        &build.app,
        &build.dir,
        Some(Accidentals::Flats),
        Some(Theme::Dark),
    )
    .unwrap();
    assert_eq!(shown, "accidentals = flats\ntheme = dark\n");

    let build = build.rebuild().unwrap();
    assert!(!build.project.library.settings.prefer_sharps_global);
}

#[test]
fn export_import() {
    let build = Builder::init_and_build("library-export").unwrap();
    let export = build.dir.join("export.json");
    chartbook::chartbook_export_at(&build.app, &build.dir, &export).unwrap();
    assert_file_contains(&export, r#""preferSharpsGlobal": true"#);
    assert_file_contains(&export, r#""songId": "#);

    let import = build.dir.join("import.json");
    fs::write(
        &import,
        r#"{ "songs": [{ "title": "Imported", "key": "D", "sections": [] }] }"#,
    )
    .unwrap();
    chartbook::chartbook_import_at(&build.app, &build.dir, &import).unwrap();

    let library: chartbook::book::Library = read_json(&build.dir.join("library.json")).unwrap();
    assert_eq!(library.songs.len(), 1);
    assert_eq!(library.songs[0].title, "Imported");
    assert_eq!(library.setlists.len(), 1);

    chartbook::chartbook_import_at(&build.app, &build.dir, &export).unwrap();
    let build = build.rebuild().unwrap();
    assert_eq!(build.project.library.songs[0].title, "Amazing Grace (Demo)");
}

#[test]
fn song_edit() {
    let build = Builder::init_and_build("library-song-edit").unwrap();
    let demo = "Amazing Grace (Demo)";
    let show = |build: &Builder| {
        chartbook::chartbook_show_at(&build.app, &build.dir, "Grace", 1, None, ViewKind::Chords)
            .unwrap()
    };

    song(
        &build,
        SongCmd::Edit {
            song: demo.into(),
            title: Some("Grace".into()),
            artist: Some("".into()),
            key: Some("G major".into()),
            accidentals: Some(Accidentals::Flats),
            global_accidentals: false,
        },
    );
    let chart = show(&build);
    assert!(chart.contains("\nGrace\n-----\nKey: Ab major (written in G major, +1)\n"));
    assert!(chart.contains("| Ab - Fm - Eb - Db |"));

    song(
        &build,
        SongCmd::Edit {
            song: "grace".into(),
            title: None,
            artist: None,
            key: None,
            accidentals: None,
            global_accidentals: true,
        },
    );
    let build = build.rebuild().unwrap();
    let edited = build.project.library.find_song("Grace").unwrap();
    assert_eq!(edited.prefer_sharps, None);
    assert_eq!(edited.artist, None);
    assert!(show(&build).contains("| G# - Fm - D# - C# |"));
}

#[test]
fn song_sections() {
    let build = Builder::init_and_build("library-sections").unwrap();
    let demo = || "Amazing Grace (Demo)".to_owned();

    section(
        &build,
        SectionCmd::Add {
            song: demo(),
            name: "Outro".into(),
        },
    );
    section(
        &build,
        SectionCmd::Line {
            song: demo(),
            section: "outro".into(),
            kind: LineKind::Mixed,
            chords: Some("G - D/F#".into()),
            lyrics: Some("Amen".into()),
        },
    );
    section(
        &build,
        SectionCmd::Line {
            song: demo(),
            section: "4".into(),
            kind: LineKind::Lyrics,
            chords: None,
            lyrics: None,
        },
    );
    section(
        &build,
        SectionCmd::Move {
            song: demo(),
            section: "Outro".into(),
            direction: Direction::Up,
        },
    );
    section(
        &build,
        SectionCmd::Remove {
            song: demo(),
            section: "1".into(),
        },
    );

    let build = build.rebuild().unwrap();
    let song = build.project.library.find_song(&demo()).unwrap();
    let names: Vec<_> = song.sections.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Verse", "Outro", "Chorus"]);
    assert_eq!(
        song.sections[1].lines,
        [
            SectionLine::chords("| C - G - Am - F |"),
            SectionLine::mixed("G - D/F#", "Amen"),
            SectionLine::lyrics(""),
        ]
    );

    let err = chartbook::chartbook_song_at(
        &build.app,
        &build.dir,
        SongCmd::Section(SectionCmd::Remove {
            song: demo(),
            section: "Bridge".into(),
        }),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Song 'Amazing Grace (Demo)' has no section matching 'Bridge'"
    );
}

#[test]
fn song_export_import() {
    let build = Builder::init_and_build("library-song-export").unwrap();
    new_song(&build, "Placeholder", "D");
    let build = build.rebuild().unwrap();
    let placeholder_id = build.project.library.find_song("Placeholder").unwrap().id.clone();
    let file = build.dir.join("grace.json");

    song(
        &build,
        SongCmd::Export {
            song: "amazing grace (demo)".into(),
            file: file.clone(),
        },
    );
    assert_file_contains(&file, r#""title": "Amazing Grace (Demo)""#);

    // Without an id, the import takes over the replaced song's id
    let mut exported: serde_json::Value = read_json(&file).unwrap();
    exported.as_object_mut().unwrap().remove("id");
    fs::write(&file, serde_json::to_string(&exported).unwrap()).unwrap();

    song(
        &build,
        SongCmd::Import {
            song: "placeholder".into(),
            file,
        },
    );
    let build = build.rebuild().unwrap();
    let titles: Vec<_> = build.project.library.songs.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, ["Amazing Grace (Demo)", "Amazing Grace (Demo)"]);
    assert_eq!(build.project.library.songs[0].id, placeholder_id);
}

#[test]
fn setlist_export_import() {
    let build = Builder::init_and_build("library-setlist-export").unwrap();
    let file = build.dir.join("demo.json");
    let demo_id = build.project.library.setlists[0].id.clone();

    setlist(
        &build,
        SetlistCmd::Export {
            setlist: "demo".into(),
            file: file.clone(),
        },
    );
    assert_file_contains(&file, r#""transpose": 2"#);

    fs::write(
        &file,
        r#"{ "name": "Imported", "items": [{ "songId": "gone", "transpose": 3 }] }"#,
    )
    .unwrap();
    setlist(
        &build,
        SetlistCmd::Import {
            setlist: "Demo".into(),
            file,
        },
    );

    let library: chartbook::book::Library = read_json(&build.dir.join("library.json")).unwrap();
    assert_eq!(library.setlists.len(), 1);
    assert_eq!(library.setlists[0].id, demo_id);
    assert_eq!(library.setlists[0].name, "Imported");
    assert_eq!(library.setlists[0].items[0].transpose, 3);
}
