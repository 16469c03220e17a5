use std::path::Path;
use std::rc::Rc;

use notes_core::config::PresenterConfig;
use notes_core::presenter::{CategoryListPresenter, Route};
use notes_core::{Category, Store};

use crate::commands::common::{find_row, normalize_words, open_store, resolve_note};
use crate::error::CliError;
use crate::terminal::TerminalView;

/// Open the picker for `note_query` with its list loaded.
fn open_picker(
    store: &Rc<Store>,
    note_query: &str,
    config: &PresenterConfig,
) -> Result<CategoryListPresenter<TerminalView>, CliError> {
    let note = resolve_note(note_query, store)?;
    let handle = store.bind_note(note);
    let mut presenter = CategoryListPresenter::new(&handle, config.clone(), TerminalView::default())?;
    presenter.load();
    Ok(presenter)
}

fn print_screen(presenter: &CategoryListPresenter<TerminalView>) {
    for line in presenter.view().render(presenter.title()) {
        println!("{line}");
    }
}

fn find_category(store: &Store, name: &str) -> Result<Category, CliError> {
    store
        .find_category_by_name(name)?
        .ok_or_else(|| CliError::CategoryNotFound(name.to_string()))
}

pub fn run_category_list(
    note_query: &str,
    as_json: bool,
    config: &PresenterConfig,
    db_path: &Path,
) -> Result<(), CliError> {
    let store = open_store(db_path)?;
    let presenter = open_picker(&store, note_query, config)?;

    if as_json {
        let snapshot = presenter.view().snapshot(presenter.title());
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_screen(&presenter);
    }

    Ok(())
}

pub fn run_category_pick(
    note_query: &str,
    name_parts: &[String],
    config: &PresenterConfig,
    db_path: &Path,
) -> Result<(), CliError> {
    let name = normalize_words(name_parts).ok_or(CliError::EmptyCategoryName)?;

    let store = open_store(db_path)?;
    let mut presenter = open_picker(&store, note_query, config)?;
    let index = find_row(&presenter, &name)?;

    presenter.select_row(index)?.expect_named(Route::Pop.name())?;
    let category = presenter.category_at(index)?;
    println!("{} -> {}", presenter.note().id, category.name);
    Ok(())
}

pub fn run_category_add(name_parts: &[String], db_path: &Path) -> Result<(), CliError> {
    let name = normalize_words(name_parts).ok_or(CliError::EmptyCategoryName)?;

    let store = open_store(db_path)?;
    let category = store.create_category(&name)?;

    println!("{}", category.id);
    Ok(())
}

pub fn run_category_rename(name: &str, new_name: &str, db_path: &Path) -> Result<(), CliError> {
    let name = name.trim();
    if name.is_empty() || new_name.trim().is_empty() {
        return Err(CliError::EmptyCategoryName);
    }

    let store = open_store(db_path)?;
    let category = find_category(&store, name)?;
    let renamed = store.rename_category(&category.id, new_name)?;

    println!("{} -> {}", category.name, renamed.name);
    Ok(())
}

pub fn run_category_delete(
    name_parts: &[String],
    note_query: Option<&str>,
    config: &PresenterConfig,
    db_path: &Path,
) -> Result<(), CliError> {
    let name = normalize_words(name_parts).ok_or(CliError::EmptyCategoryName)?;
    let store = open_store(db_path)?;

    if let Some(note_query) = note_query {
        let mut presenter = open_picker(&store, note_query, config)?;
        let index = find_row(&presenter, &name)?;
        presenter.delete_row(index)?;
        print_screen(&presenter);
    } else {
        let category = find_category(&store, &name)?;
        store.delete_category(&category.id)?;
        println!("Deleted category {}", category.name);
    }

    Ok(())
}
