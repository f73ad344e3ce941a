use crate::animation::Animation;
use crate::geometry::{DOWN, GREEN, LEFT, RED, RIGHT, UP};
use crate::layout::{Arrangement, GridConfig};
use crate::scene::{Scene, SceneContext};
use anyhow::{Context, Result};

const PORTRAIT_DIR: &str = "mathematicians";

/// Gallery of the field's founders, then the question the video asks
pub struct Mathematicians;

impl Scene for Mathematicians {
    fn name(&self) -> &'static str {
        "Mathematicians"
    }

    fn description(&self) -> &'static str {
        "Portrait gallery, the guiding question and the computability table"
    }

    fn construct(&self, ctx: &mut SceneContext<'_>) -> Result<()> {
        let portraits = ctx
            .scan_assets(PORTRAIT_DIR)
            .context("Failed to load mathematician portraits")?;

        let mut cards = Vec::with_capacity(portraits.len());
        for (name, image) in portraits {
            ctx.scale_to_fit_height(image, 2.5)?;
            let caption = ctx.tex(&[name.as_str()], 40.0);
            let card = ctx.group(&[image, caption])?;
            ctx.arrange(card, &Arrangement::linear(DOWN))?;
            cards.push(card);
        }

        let gallery = ctx.group(&cards)?;
        ctx.arrange(
            gallery,
            &Arrangement::grid(GridConfig::rows(2).with_col_widths(vec![3.0, 3.0])),
        )?;
        ctx.play(vec![Animation::group(
            cards
                .iter()
                .map(|card| Animation::fade_in_shift(*card, DOWN))
                .collect(),
            0.25,
        )
        .with_run_time(2.0)])?;
        ctx.wait();

        ctx.play(vec![Animation::animate(gallery)
            .arrange(Arrangement::linear(RIGHT))
            .shift(UP * 1.5)
            .scale_to_fit_height(2.0)
            .build()])?;
        ctx.wait();

        let question = ctx.tex_in(
            &[r"
        What are the classes of problems \\
        that computers can solve?
        "],
            "flushleft",
            48.0,
        );
        ctx.shift(question, DOWN)?;
        let alt_question = ctx.tex_in(
            &[r"
        {{What}} kind of problems are practically \\
        impossible for computers to solve?
        "],
            "flushleft",
            48.0,
        );
        ctx.shift(alt_question, DOWN)?;

        ctx.play(vec![Animation::write(question)])?;
        ctx.wait();
        ctx.play(vec![Animation::transform(question, alt_question)])?;
        ctx.wait();
        ctx.play(vec![Animation::fade_out_shift(
            &[question, alt_question, gallery],
            UP,
        )])?;

        let possible = ctx.tex(&["Possible for computers"], 48.0);
        ctx.set_color(possible, GREEN)?;
        let impossible = ctx.tex(&["Practically impossible"], 48.0);
        ctx.set_color(impossible, RED)?;

        let rows = vec![
            vec![
                "Arithmetic",
                r"Halting Problem (determining if a\\given series of instructions will\\infinitely loop",
            ],
            vec!["Polynomial Factoring", "General, rigorous, logical proof"],
            vec!["Root finding", "Extremely large prime factorization"],
            vec!["Graph theory...?", ""],
        ];
        let table = ctx.table(
            &rows,
            vec![possible, impossible],
            30.0,
            GridConfig::default().with_cell_alignment(LEFT + UP),
        )?;
        ctx.play(vec![Animation::fade_in(table)])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::SceneError;
    use crate::mobject::VisualKind;
    use crate::scene::registry::BuildOptions;
    use crate::scene::{SceneRecord, SceneRegistry};
    use crate::scenes::fixtures;

    fn build(dir: &std::path::Path) -> anyhow::Result<SceneRecord> {
        SceneRegistry::builtin().build("Mathematicians", &BuildOptions::new(dir, 0))
    }

    fn captions(record: &SceneRecord) -> Vec<String> {
        (0..record.objects.len())
            .filter_map(|i| record.objects.get(crate::mobject::ObjectId(i)).ok())
            .filter_map(|o| match &o.kind {
                VisualKind::Text(t) => Some(t.source()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_captions_come_from_file_names() {
        let assets = fixtures::asset_dir();
        let record = build(assets.path()).unwrap();
        let captions = captions(&record);
        for name in ["Alan Turing", "Alonzo Church", "Emil Post", "Kurt Godel"] {
            assert!(captions.iter().any(|c| c == name), "missing caption {name}");
        }
    }

    #[test]
    fn test_gallery_fade_is_staggered_over_two_units() {
        let assets = fixtures::asset_dir();
        let record = build(assets.path()).unwrap();
        let first = &record.timeline.steps()[0];
        assert!((first.duration - 2.0).abs() < 1e-9);

        let starts: Vec<f64> = first.tracks().iter().map(|t| t.start).collect();
        assert_eq!(starts.len(), 4);
        let d = first.tracks()[0].duration();
        for (i, start) in starts.iter().enumerate() {
            assert!((start - i as f64 * 0.25 * d).abs() < 1e-9);
        }
    }

    #[test]
    fn test_written_question_keeps_its_text() {
        let assets = fixtures::asset_dir();
        let record = build(assets.path()).unwrap();
        let write = record
            .tracks()
            .find(|t| t.animation == "Write")
            .unwrap();
        let question = record.objects.get(write.targets[0]).unwrap();
        assert!(question
            .tex()
            .unwrap()
            .source()
            .contains("What are the classes of problems"));

        let transform = record
            .tracks()
            .find(|t| t.animation == "Transform")
            .unwrap();
        let (leaf, look) = transform.morph[0];
        assert_eq!(leaf, write.targets[0]);
        let alt = record.objects.get(look).unwrap().tex().unwrap().source();
        assert!(alt.contains("practically"));
    }

    #[test]
    fn test_ends_with_table_on_screen() {
        let assets = fixtures::asset_dir();
        let record = build(assets.path()).unwrap();
        let last = record.tracks().last().unwrap();
        assert_eq!(last.animation, "FadeIn");
        let table = last.targets[0];
        assert!(matches!(
            record.objects.get(table).unwrap().kind,
            VisualKind::Table { rows: 5, cols: 2, .. }
        ));
        // header plus four rows of two cells
        assert_eq!(record.visible.len(), 10);
    }

    #[test]
    fn test_missing_portrait_directory() {
        let assets = tempfile::TempDir::new().unwrap();
        let err = build(assets.path()).unwrap_err();
        assert!(err
            .chain()
            .any(|e| matches!(e.downcast_ref::<SceneError>(), Some(SceneError::NotFound(_)))));
    }

    #[test]
    fn test_grid_rejects_portrait_count_not_matching_columns() {
        let assets = fixtures::asset_dir();
        fixtures::remove(assets.path(), "mathematicians/Emil_Post.jpg");
        fixtures::remove(assets.path(), "mathematicians/Kurt_Godel.jpg");
        // two portraits in two rows leave one column for two widths
        let err = build(assets.path()).unwrap_err();
        assert!(err
            .chain()
            .any(|e| matches!(e.downcast_ref::<SceneError>(), Some(SceneError::Layout(_)))));
    }
}
