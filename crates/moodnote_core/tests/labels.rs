use moodnote_core::db::open_db_in_memory;
use moodnote_core::{
    LabelService, LabelServiceError, Note, NoteColor, NoteRepository, SqliteLabelRepository,
    SqliteNoteRepository,
};

#[test]
fn create_label_normalizes_name_and_defaults_to_blue() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteLabelRepository::try_new(&mut conn).unwrap();
    let mut service = LabelService::new(repo);

    let label = service.create_label("  Work ", None).unwrap();
    assert_eq!(label.name, "work");
    assert_eq!(label.color, NoteColor::Blue);

    let listed = service.list_labels().unwrap();
    assert_eq!(listed, vec![label]);
}

#[test]
fn duplicate_names_are_rejected_ignoring_case() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteLabelRepository::try_new(&mut conn).unwrap();
    let mut service = LabelService::new(repo);

    service.create_label("ideas", Some(NoteColor::Yellow)).unwrap();
    let err = service.create_label("IDEAS", None).unwrap_err();
    match err {
        LabelServiceError::Duplicate(name) => assert_eq!(name, "ideas"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn blank_label_name_is_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteLabelRepository::try_new(&mut conn).unwrap();
    let mut service = LabelService::new(repo);

    assert!(matches!(
        service.create_label("   ", None),
        Err(LabelServiceError::BlankName)
    ));
}

#[test]
fn labels_list_sorted_and_include_ones_registered_by_notes() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let mut notes = SqliteNoteRepository::try_new(&mut conn).unwrap();
        let mut note = Note::new("Shopping", "milk");
        note.labels = vec!["errands".to_string()];
        notes.create_note(&note).unwrap();
    }

    let repo = SqliteLabelRepository::try_new(&mut conn).unwrap();
    let mut service = LabelService::new(repo);
    service.create_label("books", Some(NoteColor::Rose)).unwrap();

    let names = service
        .list_labels()
        .unwrap()
        .into_iter()
        .map(|label| (label.name, label.color))
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec![
            ("books".to_string(), NoteColor::Rose),
            ("errands".to_string(), NoteColor::Blue),
        ]
    );
}
