//! Pure update function for the shortcut board.
//!
//! `update()` takes the current model and a message, mutates the model, and
//! returns a command describing any side-effects the runtime should execute.
//! This module performs zero I/O.

use super::catalog::Catalog;
use super::layout::layout_for_width;
use super::model::{BoardCmd, BoardEvent, BoardModel, BoardMsg, Mode};
use super::paginator::{clamp_page, page_after_swipe};
use super::reorder::{DropOutcome, apply_drop};

/// Apply a message to the model and return the next command for the runtime.
pub fn update(model: &mut BoardModel, msg: BoardMsg) -> BoardCmd {
    match msg {
        BoardMsg::ShortcutsFetched(records) => {
            if let Some(catalog) = model.catalog.as_mut() {
                // Arrangement is local once loaded; only health moves.
                catalog.refresh_status(&records);
                model.status_refreshes += 1;
                return BoardCmd::None;
            }
            let catalog = Catalog::from_records(records);
            let event = BoardEvent::Loaded {
                shortcuts: catalog.len(),
                favorites: catalog.favorites().len(),
            };
            model.catalog = Some(catalog);
            model.clamp_current_page();
            BoardCmd::Record(event)
        }

        BoardMsg::FetchFailed { code, message } => {
            model.fetch_errors += 1;
            BoardCmd::Record(BoardEvent::FetchFailed { code, message })
        }

        BoardMsg::Resize { width } => {
            model.layout = layout_for_width(width);
            model.clamp_current_page();
            BoardCmd::None
        }

        BoardMsg::SetSearch(text) => {
            model.search = text;
            model.clamp_current_page();
            BoardCmd::None
        }

        BoardMsg::SetPage(page) => {
            model.current_page = clamp_page(page, model.total_pages());
            BoardCmd::None
        }

        BoardMsg::Swipe {
            direction,
            velocity,
        } => {
            if let Some(page) = page_after_swipe(
                model.current_page,
                model.total_pages(),
                direction,
                velocity,
                model.dragging,
            ) {
                model.current_page = page;
            }
            BoardCmd::None
        }

        BoardMsg::DragStart => {
            if !model.is_locked() && model.is_loaded() {
                model.dragging = true;
            }
            BoardCmd::None
        }

        BoardMsg::DragEnd(result) => {
            model.dragging = false;
            if model.is_locked() {
                return BoardCmd::None;
            }
            let grid = model.grid_position();
            let Some(catalog) = model.catalog.as_mut() else {
                return BoardCmd::None;
            };
            let outcome = apply_drop(catalog, grid, &model.search, result);
            model.last_drop = Some(outcome);
            if matches!(outcome, DropOutcome::Applied { .. }) {
                model.clamp_current_page();
            }
            match outcome {
                DropOutcome::Ignored => BoardCmd::None,
                outcome => BoardCmd::Record(BoardEvent::Drop { outcome }),
            }
        }

        BoardMsg::ToggleLock => toggle_lock(model),

        BoardMsg::Activate(id) => {
            if !model.is_locked() {
                return BoardCmd::None;
            }
            model
                .catalog
                .as_ref()
                .and_then(|c| c.get(id))
                .map_or(BoardCmd::None, |shortcut| BoardCmd::Launch {
                    id,
                    url: shortcut.launch_url(),
                })
        }
    }
}

/// Flip between Edit and Browse; locking emits the one save of the session.
fn toggle_lock(model: &mut BoardModel) -> BoardCmd {
    model.mode = model.mode.toggled();
    match model.mode {
        Mode::Edit => BoardCmd::Record(BoardEvent::Unlocked),
        Mode::Browse => {
            model.dragging = false;
            let Some(catalog) = model.catalog.as_ref() else {
                return BoardCmd::None;
            };
            BoardCmd::Batch(vec![
                BoardCmd::Record(BoardEvent::Locked {
                    shortcuts: catalog.len(),
                }),
                BoardCmd::Save(catalog.save_payload()),
            ])
        }
    }
}
