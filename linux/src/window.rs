/// Main window: a notebook of terminal tabs with a "+" button, plus the
/// Ctrl shortcuts handled by `libgsf::App`.

use crate::terminal::VteFactory;
use gtk4 as gtk;
use gtk::prelude::*;
use gtk::{gdk, glib};
use libgsf::config::ConfigStore;
use libgsf::keybinding::Modifiers;
use libgsf::session::SessionId;
use libgsf::{App, Dispatch, Event};
use log::{error, warn};
use std::cell::RefCell;
use std::rc::Rc;

const WINDOW_TITLE: &str = "GSF-Term";
const DEFAULT_WIDTH: i32 = 800;
const DEFAULT_HEIGHT: i32 = 600;

type SharedApp = Rc<RefCell<App<VteFactory>>>;

pub fn build_ui(gtk_app: &gtk::Application) {
    let app = match ConfigStore::user_default() {
        Ok(store) => App::new(store, VteFactory),
        Err(e) => {
            warn!("{e}; settings will not be saved");
            App::in_memory(VteFactory)
        }
    };
    let app: SharedApp = Rc::new(RefCell::new(app));

    let window = gtk::ApplicationWindow::builder()
        .application(gtk_app)
        .title(WINDOW_TITLE)
        .default_width(DEFAULT_WIDTH)
        .default_height(DEFAULT_HEIGHT)
        .build();

    let notebook = gtk::Notebook::new();
    notebook.set_scrollable(true);

    let new_tab = gtk::Button::with_label("+");
    let help = format!("New tab\n{}", app.borrow().shortcut_help());
    new_tab.set_tooltip_text(Some(&help));
    new_tab.set_has_frame(false);
    {
        let app = app.clone();
        let notebook = notebook.clone();
        new_tab.connect_clicked(move |_| open_tab(&app, &notebook));
    }
    notebook.set_action_widget(&new_tab, gtk::PackType::End);
    window.set_child(Some(&notebook));

    // Capture phase so the shortcuts win over the terminal's own key handling.
    let keys = gtk::EventControllerKey::new();
    keys.set_propagation_phase(gtk::PropagationPhase::Capture);
    {
        let app = app.clone();
        let notebook = notebook.clone();
        keys.connect_key_pressed(move |_, keyval, _, state| on_key(&app, &notebook, keyval, state));
    }
    window.add_controller(keys);

    open_tab(&app, &notebook);
    window.present();
}

fn modifiers_from(state: gdk::ModifierType) -> Modifiers {
    let mut mods = Modifiers::empty();
    mods.set(Modifiers::CONTROL, state.contains(gdk::ModifierType::CONTROL_MASK));
    mods.set(Modifiers::SHIFT, state.contains(gdk::ModifierType::SHIFT_MASK));
    mods.set(Modifiers::ALT, state.contains(gdk::ModifierType::ALT_MASK));
    mods.set(Modifiers::SUPER, state.contains(gdk::ModifierType::SUPER_MASK));
    mods
}

fn on_key(
    app: &SharedApp,
    notebook: &gtk::Notebook,
    keyval: gdk::Key,
    state: gdk::ModifierType,
) -> glib::Propagation {
    let Some(key) = keyval.to_unicode() else {
        return glib::Propagation::Proceed;
    };
    if !sync_active(app, notebook) {
        return glib::Propagation::Proceed;
    }
    let result = app.borrow_mut().handle_key(modifiers_from(state), &key.to_string());
    match result {
        Ok(dispatch) if dispatch.consumed() => glib::Propagation::Stop,
        Ok(_) => glib::Propagation::Proceed,
        Err(e) => {
            error!("{e}");
            glib::Propagation::Proceed
        }
    }
}

/// Point the registry at the notebook's visible page. False when that page
/// is not a terminal session (e.g. an error page).
fn sync_active(app: &SharedApp, notebook: &gtk::Notebook) -> bool {
    let Some(current) = notebook.nth_page(notebook.current_page()) else {
        return false;
    };
    let mut app = app.borrow_mut();
    let id = app
        .sessions()
        .iter()
        .find(|s| s.widget().0.upcast_ref::<gtk::Widget>() == &current)
        .map(|s| s.id());
    match id {
        Some(id) => app.dispatch(Event::Select(id)).is_ok(),
        None => false,
    }
}

fn open_tab(app: &SharedApp, notebook: &gtk::Notebook) {
    let result = app.borrow_mut().dispatch(Event::NewTab);
    let id = match result {
        Ok(Dispatch::Created(id)) => id,
        Ok(_) => return,
        Err(e) => {
            show_error_page(notebook, &e.to_string());
            return;
        }
    };

    let Some((label, terminal)) = app
        .borrow()
        .sessions()
        .get(id)
        .map(|s| (s.label().to_owned(), s.widget().0.clone()))
    else {
        return;
    };

    let tab = {
        let app = app.clone();
        let notebook = notebook.clone();
        tab_label(&label, move || close_tab(&app, &notebook, id))
    };
    let page = notebook.append_page(&terminal, Some(&tab));
    notebook.set_current_page(Some(page));
    terminal.grab_focus();
}

fn close_tab(app: &SharedApp, notebook: &gtk::Notebook, id: SessionId) {
    let result = app.borrow_mut().dispatch(Event::CloseTab(id));
    if let Ok(Dispatch::Closed(session)) = result {
        let terminal = session.into_widget().0;
        if let Some(page) = notebook.page_num(&terminal) {
            notebook.remove_page(Some(page));
        }
        sync_active(app, notebook);
    }
}

/// A page that explains why a tab could not be opened. It is not a session.
fn show_error_page(notebook: &gtk::Notebook, message: &str) {
    let body = gtk::Label::new(Some(&format!("Could not start a terminal:\n{message}")));
    body.set_wrap(true);
    body.set_hexpand(true);
    body.set_vexpand(true);

    let tab = {
        let notebook = notebook.clone();
        let body = body.clone();
        tab_label("Error", move || {
            if let Some(page) = notebook.page_num(&body) {
                notebook.remove_page(Some(page));
            }
        })
    };
    let page = notebook.append_page(&body, Some(&tab));
    notebook.set_current_page(Some(page));
}

fn tab_label(text: &str, on_close: impl Fn() + 'static) -> gtk::Box {
    let label = gtk::Label::new(Some(text));
    label.set_hexpand(true);

    let close = gtk::Button::with_label("×");
    close.set_tooltip_text(Some("Close tab"));
    close.set_has_frame(false);
    close.connect_clicked(move |_| on_close());

    let tab = gtk::Box::new(gtk::Orientation::Horizontal, 5);
    tab.append(&label);
    tab.append(&close);
    tab
}
