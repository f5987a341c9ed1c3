/// VTE widget adapter: lets the session registry drive `vte4::Terminal`.

use gtk4 as gtk;
use gtk::prelude::*;
use gtk::{gdk, gio, glib};
use libgsf::session::{TerminalFactory, TerminalWidget};
use libgsf::shell::SpawnRequest;
use libgsf::theme::{Palette, Rgba};
use libgsf::Error;
use log::{error, info};
use vte4::prelude::*;

#[derive(Debug, Clone)]
pub struct VteWidget(pub vte4::Terminal);

fn to_gdk(c: Rgba) -> gdk::RGBA {
    gdk::RGBA::new(c.r, c.g, c.b, c.a)
}

impl TerminalWidget for VteWidget {
    fn set_colors(&self, palette: &Palette) {
        self.0.set_color_background(&to_gdk(palette.background));
        self.0.set_color_foreground(&to_gdk(palette.foreground));
        self.0.set_color_cursor(Some(&to_gdk(palette.cursor)));
    }

    fn set_font_scale(&self, scale: f64) {
        self.0.set_font_scale(scale);
    }
}

/// Spawns shells into fresh VTE widgets.
pub struct VteFactory;

impl TerminalFactory for VteFactory {
    type Widget = VteWidget;

    fn spawn(&mut self, request: &SpawnRequest) -> libgsf::Result<VteWidget> {
        let terminal = vte4::Terminal::new();
        terminal.set_scrollback_lines(request.scrollback_lines);
        terminal.set_hexpand(true);
        terminal.set_vexpand(true);

        let argv: Vec<&str> = request.argv.iter().map(String::as_str).collect();
        let envv: Vec<&str> = request.env.iter().map(String::as_str).collect();
        let working_dir = request.working_dir.as_deref().and_then(|p| p.to_str());
        let shell = request.shell.display().to_string();
        let weak = terminal.downgrade();

        // The child is started asynchronously; a late failure is written
        // into the tab so it does not just sit there blank.
        terminal.spawn_async(
            vte4::PtyFlags::DEFAULT,
            working_dir,
            &argv,
            &envv,
            glib::SpawnFlags::SEARCH_PATH,
            || {},
            -1,
            None::<&gio::Cancellable>,
            move |result| match result {
                Ok(pid) => info!("{shell} started, pid {pid:?}"),
                Err(e) => {
                    let err = Error::SessionSpawnFailed { shell, reason: e.to_string() };
                    error!("{err}");
                    if let Some(terminal) = weak.upgrade() {
                        terminal.feed(format!("\r\n{err}\r\n").as_bytes());
                    }
                }
            },
        );

        Ok(VteWidget(terminal))
    }
}
