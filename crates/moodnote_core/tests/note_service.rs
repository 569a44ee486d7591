use moodnote_core::db::open_db_in_memory;
use moodnote_core::{
    ChecklistItem, Mood, NoteColor, NoteDraft, NoteKind, NotePatch, NoteQuery, NoteService,
    NoteServiceError, SortKey, SqliteNoteRepository,
};
use uuid::Uuid;

#[test]
fn create_rejects_fully_blank_draft() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);

    let err = service.create_note(NoteDraft::new("  ", "\n")).unwrap_err();
    assert!(matches!(err, NoteServiceError::EmptyNote));
}

#[test]
fn create_fills_untitled_and_detects_mood() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);

    let note = service
        .create_note(NoteDraft::new("", "Feeling so grateful and thankful today"))
        .unwrap();
    assert_eq!(note.title, "Untitled");
    assert_eq!(note.mood, Some(Mood::Grateful));
    assert!(note.mood_confidence.unwrap() > 0.0);
    assert!(note.mood_detection);
}

#[test]
fn create_keeps_manual_mood_when_detection_disabled() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);

    let mut draft = NoteDraft::new("Journal", "so happy");
    draft.mood_detection = false;
    draft.mood = Some(Mood::Tired);
    let note = service.create_note(draft).unwrap();
    assert_eq!(note.mood, Some(Mood::Tired));
    assert_eq!(note.mood_confidence, Some(1.0));
}

#[test]
fn create_title_only_note_has_no_detected_mood() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);

    let note = service.create_note(NoteDraft::new("Happy title", "")).unwrap();
    assert_eq!(note.mood, None);
    assert_eq!(note.mood_confidence, None);
}

#[test]
fn checklist_text_feeds_mood_detection() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);

    let mut draft = NoteDraft::new("Today", "");
    draft.kind = NoteKind::Checklist;
    draft.checklist = vec![ChecklistItem::new("nap, so exhausted")];
    let note = service.create_note(draft).unwrap();
    assert_eq!(note.mood, Some(Mood::Tired));
}

#[test]
fn update_is_partial_and_redetects_on_content_change() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);

    let mut draft = NoteDraft::new("Week", "calm and peaceful");
    draft.color = NoteColor::Green;
    draft.labels = vec!["Journal".to_string()];
    let created = service.create_note(draft).unwrap();
    assert_eq!(created.mood, Some(Mood::Calm));

    let updated = service
        .update_note(
            created.id,
            NotePatch {
                content: Some("furious and angry".to_string()),
                ..NotePatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.mood, Some(Mood::Angry));
    assert_eq!(updated.title, "Week");
    assert_eq!(updated.color, NoteColor::Green);
    assert_eq!(updated.labels, vec!["journal"]);
    assert!(updated.updated_at >= created.updated_at);
}

#[test]
fn update_with_manual_mood_disables_detection() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);

    let created = service.create_note(NoteDraft::new("x", "so sad")).unwrap();
    let updated = service
        .update_note(
            created.id,
            NotePatch {
                mood: Some(Some(Mood::Hopeful)),
                content: Some("still sad".to_string()),
                ..NotePatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.mood, Some(Mood::Hopeful));
    assert_eq!(updated.mood_confidence, Some(1.0));
    assert!(!updated.mood_detection);

    let again = service
        .update_note(
            created.id,
            NotePatch {
                content: Some("very happy now".to_string()),
                ..NotePatch::default()
            },
        )
        .unwrap();
    assert_eq!(again.mood, Some(Mood::Hopeful));
}

#[test]
fn update_clears_nullable_fields() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);

    let mut draft = NoteDraft::new("Photo", "");
    draft.image_url = Some("/uploads/a.png".to_string());
    draft.category = Some("media".to_string());
    let created = service.create_note(draft).unwrap();
    assert!(created.has_image());

    let updated = service
        .update_note(
            created.id,
            NotePatch {
                image_url: Some(None),
                category: Some(None),
                ..NotePatch::default()
            },
        )
        .unwrap();
    assert!(!updated.has_image());
    assert_eq!(updated.category, None);
}

#[test]
fn toggles_set_color_and_set_mood() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);

    let created = service.create_note(NoteDraft::new("Flags", "")).unwrap();
    assert!(service.toggle_pin(created.id).unwrap().is_pinned);
    assert!(!service.toggle_pin(created.id).unwrap().is_pinned);
    assert!(service.toggle_archive(created.id).unwrap().is_archived);
    assert!(service.toggle_favorite(created.id).unwrap().is_favorite);
    assert_eq!(
        service.set_color(created.id, NoteColor::Purple).unwrap().color,
        NoteColor::Purple
    );

    let moody = service.set_mood(created.id, Some(Mood::Calm)).unwrap();
    assert_eq!(moody.mood, Some(Mood::Calm));
    assert!(!moody.mood_detection);

    let stored = service.get_note(created.id).unwrap().unwrap();
    assert_eq!(stored, moody);
}

#[test]
fn set_labels_rejects_blank_and_normalizes() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);

    let created = service.create_note(NoteDraft::new("Labels", "")).unwrap();
    let err = service
        .set_labels(created.id, vec!["ok".to_string(), "".to_string()])
        .unwrap_err();
    assert!(matches!(err, NoteServiceError::InvalidLabel(_)));

    let labeled = service
        .set_labels(created.id, vec!["Home".to_string(), "home".to_string()])
        .unwrap();
    assert_eq!(labeled.labels, vec!["home"]);
}

#[test]
fn missing_note_operations_report_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);

    let id = Uuid::new_v4();
    assert!(matches!(
        service.toggle_pin(id),
        Err(NoteServiceError::NoteNotFound(missing)) if missing == id
    ));
    assert!(matches!(
        service.delete_note(id),
        Err(NoteServiceError::NoteNotFound(_))
    ));
}

#[test]
fn query_and_stats_cover_the_collection() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);

    let alpha = service
        .create_note(NoteDraft::new("Alpha", "so happy"))
        .unwrap();
    let beta = service.create_note(NoteDraft::new("Beta", "so sad")).unwrap();
    let gamma = service
        .create_note(NoteDraft::new("Gamma", "happy again"))
        .unwrap();
    service.toggle_pin(gamma.id).unwrap();
    service.toggle_archive(beta.id).unwrap();

    let query = NoteQuery {
        sort: SortKey::Title,
        ..NoteQuery::default()
    };
    let titles = service
        .query_notes(&query)
        .unwrap()
        .into_iter()
        .map(|note| note.title)
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["Gamma", "Alpha"]);

    let archived = service
        .query_notes(&NoteQuery {
            archived: true,
            ..NoteQuery::default()
        })
        .unwrap();
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0].id, beta.id);

    let stats = service.stats().unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.pinned, 1);
    assert_eq!(stats.archived, 1);
    assert_eq!(stats.dominant_mood(), Some(Mood::Happy));

    let page = service.list_notes(Some(0), 0).unwrap();
    assert_eq!(page.applied_limit, 100);
    assert_eq!(page.items.len(), 3);

    service.delete_note(alpha.id).unwrap();
    assert!(service.get_note(alpha.id).unwrap().is_none());
}

#[test]
fn draft_mood_survives_later_content_edits() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);

    let mut draft = NoteDraft::new("Mood pick", "");
    draft.mood = Some(Mood::Hopeful);
    let created = service.create_note(draft).unwrap();
    assert_eq!(created.mood, Some(Mood::Hopeful));
    assert_eq!(created.mood_confidence, Some(1.0));
    assert!(!created.mood_detection);

    let edited = service
        .update_note(
            created.id,
            NotePatch {
                content: Some("so angry".to_string()),
                ..NotePatch::default()
            },
        )
        .unwrap();
    assert_eq!(edited.mood, Some(Mood::Hopeful));
    assert_eq!(edited.mood_confidence, Some(1.0));
}
