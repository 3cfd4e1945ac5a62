use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use anyhow::Result;
use sidetoggle_config::OverlayConfig;
use sidetoggle_core::ManualClock;
use sidetoggle_overlay::{
    Host, JsonPreferenceStore, OverlayApp, PageLayout, PointerButton, PreferenceStore,
    Preferences, RecordingView, SidebarBox, StaticProbe,
};

fn open_app(store: JsonPreferenceStore) -> Result<(Rc<RefCell<RecordingView>>, OverlayApp)> {
    let view = Rc::new(RefCell::new(RecordingView::new()));
    let mut app = OverlayApp::new(
        OverlayConfig::default(),
        Host {
            view: view.clone(),
            store: Box::new(store),
            probe: Box::new(StaticProbe::absent()),
            clock: ManualClock::new(),
            page_url: "https://www.reddit.com/".to_string(),
        },
    )?;
    app.start(PageLayout::new(1000.0, vec![SidebarBox::visible(400.0)]))?;
    Ok((view, app))
}

#[test]
fn json_store_round_trips_through_nested_dirs() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let path = temp.path().join("profile").join("preferences.json");

    let mut store = JsonPreferenceStore::new(&path);
    assert_eq!(store.load()?, Preferences::default());
    assert!(!path.exists());

    let saved = Preferences {
        is_hidden: true,
        button_always_displayed: true,
    };
    store.store(&saved)?;
    assert!(path.exists());

    let mut reopened = JsonPreferenceStore::new(&path);
    assert_eq!(reopened.load()?, saved);
    Ok(())
}

#[test]
fn corrupt_file_reads_as_defaults_and_is_replaced() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let path = temp.path().join("preferences.json");
    fs::write(&path, "{ not json")?;

    let mut store = JsonPreferenceStore::new(&path);
    assert_eq!(store.load()?, Preferences::default());

    let saved = Preferences {
        is_hidden: true,
        button_always_displayed: false,
    };
    store.store(&saved)?;
    let text = fs::read_to_string(&path)?;
    assert!(text.contains("\"isHidden\": true"));
    Ok(())
}

#[test]
fn hidden_sidebar_survives_reload() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let path = temp.path().join("preferences.json");

    {
        let (_, mut app) = open_app(JsonPreferenceStore::new(&path))?;
        app.pointer_enter();
        app.pointer_down()?;
        app.pointer_up(PointerButton::Primary)?;
        assert!(app.preferences().is_hidden);
    }

    let (view, app) = open_app(JsonPreferenceStore::new(&path))?;
    assert!(app.preferences().is_hidden);
    assert_eq!(view.borrow().state().sidebar_visible, Some(false));
    assert_eq!(view.borrow().state().button_label.as_deref(), Some("Show"));
    Ok(())
}
