use crate::animation::Animation;
use crate::geometry::YELLOW;
use crate::scene::{Scene, SceneContext};
use anyhow::Result;

pub struct Quote;

impl Scene for Quote {
    fn name(&self) -> &'static str {
        "Quote"
    }

    fn description(&self) -> &'static str {
        "Opening quote, written then faded out"
    }

    fn construct(&self, ctx: &mut SceneContext<'_>) -> Result<()> {
        let quote = ctx.tex(
            &[
                r"\begin{raggedright} Mathematics is like love; a simple idea,\\
        but it can get complicated.
        \\\end{raggedright}",
                r"— Anonymous",
            ],
            40.0,
        );
        ctx.set_part_color(quote, 0, YELLOW)?;

        ctx.play(vec![Animation::write(quote).with_run_time(3.0)])?;
        ctx.play(vec![Animation::fade_out(&[quote])])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::registry::BuildOptions;
    use crate::scene::SceneRegistry;

    #[test]
    fn test_quote_timeline() {
        let record = SceneRegistry::builtin()
            .build("Quote", &BuildOptions::new(".", 0))
            .unwrap();
        let steps = record.timeline.steps();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].duration, 3.0);
        assert_eq!(steps[1].start, 3.0);
        assert_eq!(record.duration, 4.0);
        assert!(record.visible.is_empty());
    }

    #[test]
    fn test_quote_first_part_is_yellow() {
        let record = SceneRegistry::builtin()
            .build("Quote", &BuildOptions::new(".", 0))
            .unwrap();
        let write = record.tracks().next().unwrap();
        assert_eq!(write.animation, "Write");
        // only the quote itself is yellow, not the attribution
        assert_eq!(write.keyframes[0].to.color, crate::geometry::WHITE);
        let tex = record.objects.get(write.targets[0]).unwrap().tex().unwrap();
        assert_eq!(tex.parts[0].color, YELLOW);
        assert_eq!(tex.parts[1].color, crate::geometry::WHITE);
    }
}
