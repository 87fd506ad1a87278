//! Browse an in-memory system report in the terminal.
//!
//! Run with: cargo run -p treeview --example browse
//!
//! Arrows/PageUp/PageDown navigate, Shift/Ctrl extend the selection,
//! +/-/* expand, Enter marks a node, Delete removes the selection,
//! F2 edits a label, q quits. Debug logs go to browse.log.

use std::fs::File;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::{cursor, execute, queue, terminal};
use log::LevelFilter;
use simplelog::{Config, WriteLogger};
use treeview::controls::truncate_to_width;
use treeview::prelude::*;

const STATUS_ROWS: u16 = 2;

fn report() -> Arc<MemoryModel> {
    let model = Arc::new(MemoryModel::new("System report"));
    let sections = [
        ("Hardware", &["CPU", "Memory", "Storage", "Display"][..]),
        ("Software", &["Operating system", "Drivers", "Services"][..]),
        ("Network", &["Adapters", "Shares"][..]),
    ];
    for (section, items) in sections {
        let Some(parent) = model.add_child(MemoryModel::ROOT, section) else {
            continue;
        };
        for item in items {
            if let Some(node) = model.add_child(parent, *item) {
                for detail in ["Summary", "Details"] {
                    model.add_child(node, format!("{item} {detail}"));
                }
            }
        }
    }
    model
}

fn main() -> io::Result<()> {
    if let Ok(log_file) = File::create("browse.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), log_file);
    }

    let model = report();
    let mut tree = TreeView::with_model(
        model.clone(),
        TreeConfig::default()
            .with_selection_mode(SelectionMode::Multi)
            .with_label_edit(true),
    );
    let labels = model.clone();
    tree.add_control(
        TextControl::new(move |row: &RowInfo<NodeKey>| labels.label_at(&row.path).unwrap_or_default())
            .editable(),
    );
    if let Some(root) = tree.rows().root() {
        tree.expand(root);
    }

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(
        stdout,
        terminal::EnterAlternateScreen,
        event::EnableMouseCapture,
        cursor::Hide
    )?;
    let result = run(&mut stdout, &model, &mut tree);
    execute!(
        stdout,
        cursor::Show,
        event::DisableMouseCapture,
        terminal::LeaveAlternateScreen
    )?;
    terminal::disable_raw_mode()?;
    result
}

fn run(out: &mut impl Write, model: &MemoryModel, tree: &mut TreeView<MemoryModel>) -> io::Result<()> {
    let mut status = String::from("ready");
    let (width, height) = terminal::size()?;
    tree.set_size(width, height.saturating_sub(STATUS_ROWS));

    loop {
        if tree.is_dirty() {
            draw(out, tree, &status)?;
            tree.clear_dirty();
        }
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let event = event::read()?;
        match &event {
            Event::Resize(width, height) => {
                tree.set_size(*width, height.saturating_sub(STATUS_ROWS));
                continue;
            }
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                if tree.editing().is_none() && key.code == KeyCode::Char('q') {
                    return Ok(());
                }
                let consumed = tree.handle_crossterm(&event, (0, 0));
                if !consumed && key.code == KeyCode::Delete {
                    for row in tree.selected_rows() {
                        if let Some(key) = tree.rows().key(row).copied() {
                            model.remove(key);
                        }
                    }
                    tree.sync();
                }
            }
            _ => {
                tree.handle_crossterm(&event, (0, 0));
            }
        }

        for event in tree.drain_events() {
            match &event {
                TreeEvent::Activated(row) => {
                    if let Some(key) = tree.rows().key(*row).copied()
                        && let Some(label) = model.label(key)
                    {
                        let marked = match label.strip_suffix(" *") {
                            Some(plain) => plain.to_string(),
                            None => format!("{label} *"),
                        };
                        model.set_label(key, marked);
                    }
                }
                TreeEvent::EditCommitted { row, .. } => {
                    if let Some(key) = tree.rows().key(*row).copied()
                        && let Some(label) = model.label(key)
                    {
                        model.set_label(key, format!("{label} (edited)"));
                    }
                }
                _ => {}
            }
            status = format!("{event:?}");
        }
        tree.sync();
    }
}

fn draw(out: &mut impl Write, tree: &TreeView<MemoryModel>, status: &str) -> io::Result<()> {
    queue!(out, terminal::Clear(terminal::ClearType::All))?;
    for row in tree.render_rows() {
        if let Some(expander) = row.expander {
            let glyph = if row.info.expanded { "▾" } else { "▸" };
            queue!(out, cursor::MoveTo(expander.x, expander.y), Print(glyph))?;
        }
        for cell in &row.cells {
            let bounds = cell.context.bounds;
            queue!(out, cursor::MoveTo(bounds.x, bounds.y))?;
            if cell.context.draw_selection != DrawSelectionMode::None {
                queue!(out, SetAttribute(Attribute::Reverse))?;
            }
            if cell.context.draw_focus {
                queue!(out, SetAttribute(Attribute::Underlined))?;
            }
            if cell.context.editor_owner == Some(cell.control) {
                queue!(out, SetAttribute(Attribute::Bold))?;
            }
            queue!(out, Print(&cell.text), SetAttribute(Attribute::Reset))?;
        }
    }

    let top = tree.viewport().height() as u16 * tree.config().row_height;
    queue!(
        out,
        cursor::MoveTo(0, top),
        Print(format!(
            "{} rows, {} selected, {:?}",
            tree.rows().len(),
            tree.selection().len(),
            tree.input_state()
        )),
        cursor::MoveTo(0, top + 1),
        Print(truncate_to_width(status, tree.width() as usize)),
    )?;
    out.flush()
}
