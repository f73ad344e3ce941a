use crate::animation::Animation;
use crate::assets::derive_label;
use crate::geometry::{BLUE, DOWN, LEFT, RED, RIGHT, UP, WHITE};
use crate::layout::Arrangement;
use crate::mobject::ObjectId;
use crate::scene::{Scene, SceneContext};
use anyhow::Result;
use std::path::Path;

const CHURCH: &str = "mathematicians/Alonzo_Church.jpg";
const TURING: &str = "mathematicians/Alan_Turing.jpg";
const TURING_MACHINE: &str = "misc/Turing_Machine.jpg";

/// Church and Turing, and the two models of computation they proposed
pub struct ChurchAndTuring;

/// Portrait above its caption, captioned by the file's label
fn portrait(ctx: &mut SceneContext<'_>, path: &str) -> Result<ObjectId> {
    let image = ctx.image(path)?;
    ctx.scale_to_fit_width(image, 3.0)?;
    let file_name = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path);
    let caption = ctx.tex(&[derive_label(file_name)], 48.0);
    let card = ctx.group(&[image, caption])?;
    ctx.arrange(card, &Arrangement::linear(DOWN))?;
    Ok(card)
}

impl Scene for ChurchAndTuring {
    fn name(&self) -> &'static str {
        "ChurchAndTuring"
    }

    fn description(&self) -> &'static str {
        "Turing machines and the lambda calculus as idealized computers"
    }

    fn construct(&self, ctx: &mut SceneContext<'_>) -> Result<()> {
        let church = portrait(ctx, CHURCH)?;
        let turing = portrait(ctx, TURING)?;

        let pair = ctx.group(&[turing, church])?;
        ctx.arrange(pair, &Arrangement::linear(LEFT))?;
        ctx.play(vec![Animation::group(
            vec![
                Animation::fade_in_shift(turing, DOWN),
                Animation::fade_in_shift(church, DOWN),
            ],
            0.5,
        )])?;
        ctx.wait();

        ctx.play(vec![Animation::animate(pair)
            .arrange(Arrangement::linear(DOWN))
            .shift(LEFT * 5.0)
            .scale_to_fit_width(2.0)
            .build()])?;

        let strategy = ctx.tex_in(
            &[r"
        \Large \textbf{The strategy}\\
        \normalsize Construct a {{highly simplified}},\\
        mathematical (a physicist might say {{\textit{“idealized”}}})\\
        model of a computer, then investigate its properties.
        "],
            "flushleft",
            40.0,
        );
        ctx.shift(strategy, RIGHT * 1.5)?;
        ctx.set_color_by_tex(strategy, "simplified", BLUE)?;
        ctx.set_color_by_tex(strategy, "idealized", BLUE)?;

        ctx.play(vec![Animation::write(strategy).with_run_time(5.0)])?;
        ctx.wait();

        let rectangle = ctx.surrounding_rectangle(turing, WHITE)?;

        let machine = ctx.image(TURING_MACHINE)?;
        let figure_caption = ctx.tex(
            &[r"\textit{Fig. 1} A finite, mechanical model of a Turing Machine"],
            30.0,
        );
        let machine_figure = ctx.group(&[machine, figure_caption])?;
        ctx.arrange(machine_figure, &Arrangement::linear(DOWN))?;
        ctx.shift(machine_figure, RIGHT)?;

        ctx.play(vec![
            Animation::animate(strategy).shift(DOWN).build(),
            Animation::create(rectangle),
            Animation::fade_out(&[strategy]),
            Animation::fade_in(machine_figure),
        ])?;
        ctx.wait();

        let lambda_title = ctx.tex(&[r"{{$\lambda$}}-calculus"], 120.0);
        ctx.shift(lambda_title, RIGHT)?;
        let lambda_subtitle = ctx.tex(&["Modeling {{computation}} with {{functions}}"], 50.0);
        ctx.set_color_by_tex(lambda_subtitle, "computation", RED)?;
        ctx.set_color_by_tex(lambda_subtitle, "functions", BLUE)?;

        let lambda_group = ctx.group(&[lambda_title, lambda_subtitle])?;
        ctx.arrange(lambda_group, &Arrangement::linear(DOWN))?;
        ctx.shift(lambda_group, RIGHT)?;

        ctx.play(vec![
            Animation::animate(rectangle).surround(church).build(),
            Animation::group(
                vec![
                    Animation::write(lambda_title),
                    Animation::fade_in_shift(lambda_subtitle, UP),
                ],
                0.75,
            ),
            Animation::fade_out(&[machine_figure]),
        ])?;

        ctx.play(vec![
            Animation::fade_out_shift(&[lambda_group], UP),
            Animation::fade_out_shift(&[pair], LEFT),
            Animation::fade_out_shift(&[rectangle], LEFT),
        ])?;
        Ok(())
    }
}
