//! Arbitrary sequences of editor operations keep steps and buckets parallel.

use kingyo_core::AttachmentFile;
use kingyo_editor::StepEditor;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(usize),
    MoveUp(usize),
    MoveDown(usize),
    Delete(usize),
    Select(usize),
    Upload(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..8_usize).prop_map(Op::Insert),
        (0..8_usize).prop_map(Op::MoveUp),
        (0..8_usize).prop_map(Op::MoveDown),
        (0..8_usize).prop_map(Op::Delete),
        (0..8_usize).prop_map(Op::Select),
        (0..8_usize).prop_map(Op::Upload),
    ]
}

fn apply(editor: &mut StepEditor, op: &Op) {
    match *op {
        Op::Insert(i) => {
            editor.insert_step(i);
        }
        Op::MoveUp(i) => {
            editor.move_step_up(i);
        }
        Op::MoveDown(i) => {
            editor.move_step_down(i);
        }
        Op::Delete(i) => {
            editor.delete_step(i);
        }
        Op::Select(i) => {
            editor.select_step(i);
        }
        Op::Upload(i) => {
            if editor.open_file_upload_dialog(i) {
                editor.upload_files(vec![AttachmentFile::new(format!("{i}.png"), vec![1])]);
            }
        }
    }
}

proptest! {
    #[test]
    fn buckets_always_numbered_by_position(ops in prop::collection::vec(op(), 0..40)) {
        let mut editor = StepEditor::new();
        for op in &ops {
            apply(&mut editor, op);
            prop_assert!(editor.is_consistent(), "inconsistent after {:?}", op);
            for (index, bucket) in editor.buckets().iter().enumerate() {
                prop_assert_eq!(bucket.step as usize, index + 1);
            }
            prop_assert!(!editor.is_empty());
        }
    }

    #[test]
    fn selected_step_follows_its_key(
        ops in prop::collection::vec(op(), 0..40),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut editor = StepEditor::new();
        for op in &ops {
            apply(&mut editor, op);
        }
        let pick = pick.index(editor.len());
        editor.select_step(pick);
        let key = editor.steps()[pick].key;

        let last = editor.len() - 1;
        if pick > 0 {
            editor.move_step_up(pick);
        } else if pick < last {
            editor.move_step_down(pick);
        }
        let selected = editor.selected().expect("selection survives a move");
        prop_assert_eq!(editor.steps()[selected].key, key);
    }

    #[test]
    fn keys_stay_unique(ops in prop::collection::vec(op(), 0..40)) {
        let mut editor = StepEditor::new();
        for op in &ops {
            apply(&mut editor, op);
        }
        let mut keys: Vec<_> = editor.steps().iter().map(|s| s.key).collect();
        keys.sort();
        keys.dedup();
        prop_assert_eq!(keys.len(), editor.len());
    }

    #[test]
    fn files_stay_with_their_step(ops in prop::collection::vec(op(), 0..40)) {
        let mut editor = StepEditor::new();
        editor.open_file_upload_dialog(0);
        editor.upload_files(vec![AttachmentFile::new("anchor.txt", vec![0])]);
        let anchor = editor.steps()[0].key;

        for op in &ops {
            apply(&mut editor, op);
        }

        let submission = editor.to_submission();
        let anchored = submission
            .attachments
            .iter()
            .filter(|a| a.file.name == "anchor.txt")
            .collect::<Vec<_>>();
        // The anchor step may have been deleted along with its file.
        if editor.steps().iter().any(|s| s.key == anchor) {
            prop_assert_eq!(anchored.len(), 1);
            prop_assert_eq!(anchored[0].step_key, anchor);
        } else {
            prop_assert!(anchored.is_empty());
        }
    }
}
