/// GSF-Term: GTK4 window with tabbed VTE terminals.
///
/// Requires: gtk4 and vte (gtk4 flavour) development libraries
///   Fedora: sudo dnf install gtk4-devel vte291-gtk4-devel
///   Ubuntu: sudo apt install libgtk-4-dev libvte-2.91-gtk4-dev
///   Arch:   sudo pacman -S gtk4 vte4

mod terminal;
mod window;

use gtk4 as gtk;
use gtk::prelude::*;
use gtk::{gio, glib};

const APP_ID: &str = "org.gsfterm.GsfTerm";

fn main() -> glib::ExitCode {
    env_logger::init();

    let app = gtk::Application::builder()
        .application_id(APP_ID)
        .flags(gio::ApplicationFlags::NON_UNIQUE)
        .build();
    app.connect_activate(window::build_ui);
    app.run()
}
