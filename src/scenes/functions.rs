use crate::animation::Animation;
use crate::geometry::{DOWN, UP};
use crate::scene::{Scene, SceneContext};
use anyhow::Result;

pub struct Functions;

impl Scene for Functions {
    fn name(&self) -> &'static str {
        "Functions"
    }

    fn description(&self) -> &'static str {
        "Conventional function application, f(x) = x^2 evaluated at 3"
    }

    fn construct(&self, ctx: &mut SceneContext<'_>) -> Result<()> {
        let math = ctx.math_tex(&["f(", "x", ")", " = ", "x^2"], 120.0);
        let application_1 = ctx.math_tex(&["f({{3}}) = {{x^2}}"], 120.0);
        let application_2 = ctx.math_tex(&["{{f(3)}} = {{3}}^2"], 120.0);
        let application_3 = ctx.math_tex(&["{{f(3)}} = {{9}}"], 120.0);

        let header = ctx.tex(&["Conventional Functions"], 48.0);
        ctx.next_to(header, math, UP)?;

        let input_brace = ctx.brace_for_part(math, 1)?;
        let input_label = ctx.tex(&["input"], 48.0);
        ctx.next_to(input_label, input_brace, DOWN)?;

        let output_brace = ctx.brace_for_part(math, 4)?;
        let output_label = ctx.tex(&["output"], 48.0);
        ctx.next_to(output_label, output_brace, DOWN)?;

        ctx.play(vec![
            Animation::write(header),
            Animation::fade_in_shift(math, UP).with_run_time(0.5),
        ])?;
        ctx.wait();

        ctx.play(vec![
            Animation::create(input_brace),
            Animation::write(input_label),
        ])?;
        ctx.wait();

        ctx.play(vec![
            Animation::create(output_brace),
            Animation::write(output_label),
        ])?;

        ctx.play(vec![
            Animation::transform_matching_shapes(math, application_1).with_run_time(0.25)
        ])?;
        ctx.play(vec![Animation::transform_matching_tex(
            application_1,
            application_2,
        )])?;

        let new_input_brace = ctx.brace_for_part(application_3, 0)?;
        let new_output_brace = ctx.brace_for_part(application_3, 2)?;

        ctx.play(vec![
            Animation::transform(application_2, application_3),
            Animation::transform(input_brace, new_input_brace),
            Animation::animate(input_label)
                .next_to(new_input_brace, DOWN)
                .build(),
            Animation::transform(output_brace, new_output_brace),
            Animation::animate(output_label)
                .next_to(new_output_brace, DOWN)
                .build(),
        ])?;
        Ok(())
    }
}
