//! Text command console
//!
//! Maps one line of input onto one controller call. Arguments are separated
//! by whitespace: integers name objects, decimals are coordinates and
//! `tag=value` pairs filter `find_objects`.

use blocks_engine::prelude::*;
use std::fmt::Write as _;

const HELP: &str = "\
Queries:
  find_objects [tag=value ...]        list matching objects
  get_object_position <id>            point of support of an object
  get_object_tag <id> <tag>           one tag value
  iter_object_tags <id>               every tag of an object
  get_grasped_object [grasper]        object held by a grasper
  grasper_is_closed [grasper]         claw state
  grasper_is_lowered [grasper]        height state
  default_grasper [grasper]           show or change the default grasper
Actions:
  close_grasper [grasper]             (alias: close)
  open_grasper [grasper]              (alias: open)
  lower_grasper [grasper]             (alias: lower)
  raise_grasper [grasper]             (alias: raise)
  move_grasper <x|-> <y|-> [grasper]  (alias: move; `-` keeps the axis)
Other:
  show                                print the scene
  help                                this text
  exit                                leave the console";

/// Console that turns command lines into controller calls
#[derive(Debug, Default)]
pub struct CommandConsole {
    finished: bool,
}

impl CommandConsole {
    /// Create a console
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `exit` has been entered
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn execute(&mut self, controller: &mut Controller, command: &str, args: &[&str]) -> Result<String, String> {
        match command {
            "help" | "?" => Ok(HELP.to_string()),
            "exit" | "quit" => {
                self.finished = true;
                Ok("bye".to_string())
            }
            "show" => Ok(crate::render::TextRenderer::new().render(&controller.snapshot())),

            "find_objects" | "find" => {
                let filters = args.iter().map(|arg| parse_filter(arg)).collect::<Result<Vec<_>, _>>()?;
                let controller: &Controller = controller;
                let listing: Vec<_> = controller
                    .find_objects(&filters)
                    .map(|id| describe(controller, id))
                    .collect();
                if listing.is_empty() {
                    Ok("no objects match".to_string())
                } else {
                    Ok(listing.join("\n"))
                }
            }
            "get_object_position" | "position" => {
                let id = object_arg(args, 0)?;
                let position = controller.get_object_position(id).map_err(error_text)?;
                Ok(format!("({:.3}, {:.3}, {:.3})", position.x, position.y, position.z))
            }
            "get_object_tag" | "tag" => {
                let id = object_arg(args, 0)?;
                let name = args.get(1).ok_or("expected a tag name")?;
                let value = controller.get_object_tag_named(id, name).map_err(error_text)?;
                Ok(value
                    .as_object()
                    .map_or_else(|| value.to_string(), |other| describe(controller, other)))
            }
            "iter_object_tags" | "tags" => {
                let id = object_arg(args, 0)?;
                let tags = controller.iter_object_tags(id).map_err(error_text)?;
                Ok(tags
                    .map(|(tag, value)| format!("{tag}={value}"))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            "get_grasped_object" | "grasped" => {
                let held = controller.get_grasped_object(grasper_arg(args, 0)?).map_err(error_text)?;
                Ok(held.map_or_else(|| "nothing".to_string(), |id| describe(controller, id)))
            }
            "grasper_is_closed" | "closed" => controller
                .grasper_is_closed(grasper_arg(args, 0)?)
                .map(|closed| closed.to_string())
                .map_err(error_text),
            "grasper_is_lowered" | "lowered" => controller
                .grasper_is_lowered(grasper_arg(args, 0)?)
                .map(|lowered| lowered.to_string())
                .map_err(error_text),
            "default_grasper" | "default" => {
                if let Some(id) = grasper_arg(args, 0)? {
                    controller.set_default_grasper(id).map_err(error_text)?;
                }
                Ok(describe(controller, controller.default_grasper()))
            }

            "close_grasper" | "close" => act(controller.close_grasper(grasper_arg(args, 0)?)),
            "open_grasper" | "open" => act(controller.open_grasper(grasper_arg(args, 0)?)),
            "lower_grasper" | "lower" => act(controller.lower_grasper(grasper_arg(args, 0)?)),
            "raise_grasper" | "raise" => act(controller.raise_grasper(grasper_arg(args, 0)?)),
            "move_grasper" | "move" => {
                let x = coordinate_arg(args, 0)?;
                let y = coordinate_arg(args, 1)?;
                act(controller.move_grasper_partial(x, y, grasper_arg(args, 2)?))
            }

            other => Err(format!("unknown command `{other}`; try `help`")),
        }
    }
}

impl ResponseCallback for CommandConsole {
    fn respond(&mut self, controller: &mut Controller, input: &str) -> Option<String> {
        let mut words = input.split_whitespace();
        let command = words.next()?;
        let args: Vec<_> = words.collect();

        log::debug!("Console command `{command}` with {} arguments", args.len());
        match self.execute(controller, command, &args) {
            Ok(reply) => Some(reply),
            Err(error) => Some(format!("error: {error}")),
        }
    }
}

/// `kind#id[attributes]`
fn describe(controller: &Controller, id: ObjectId) -> String {
    let kind = controller.get_object_tag(id, Tag::Kind).ok();
    let kind = kind.as_ref().and_then(TagValue::as_text).unwrap_or("?");
    let mut attributes = String::new();
    for tag in [Tag::Color, Tag::Size, Tag::Height, Tag::Width] {
        if let Ok(value) = controller.get_object_tag(id, tag) {
            if !attributes.is_empty() {
                attributes.push_str(", ");
            }
            let _ = write!(attributes, "{tag}={value}");
        }
    }
    format!("{kind}#{id}[{attributes}]")
}

fn act(result: Result<(), SceneError>) -> Result<String, String> {
    result.map(|()| "ok".to_string()).map_err(error_text)
}

#[allow(clippy::needless_pass_by_value)]
fn error_text(error: SceneError) -> String {
    error.to_string()
}

fn parse_filter(arg: &str) -> Result<(Tag, TagValue), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected tag=value, got `{arg}`"))?;
    let tag = name.parse::<Tag>().map_err(|error| error.to_string())?;
    let value = tag
        .parse_value(value)
        .ok_or_else(|| format!("`{value}` is not a valid value for {tag}"))?;
    Ok((tag, value))
}

fn object_arg(args: &[&str], index: usize) -> Result<ObjectId, String> {
    let arg = args.get(index).ok_or("expected an object id")?;
    arg.parse::<u32>()
        .map(ObjectId::from)
        .map_err(|_| format!("`{arg}` is not an object id"))
}

fn grasper_arg(args: &[&str], index: usize) -> Result<Option<ObjectId>, String> {
    args.get(index).map_or(Ok(None), |_| object_arg(args, index).map(Some))
}

/// A coordinate, or `None` for `-`
fn coordinate_arg(args: &[&str], index: usize) -> Result<Option<f32>, String> {
    match *args.get(index).ok_or("expected x and y coordinates")? {
        "-" => Ok(None),
        arg => arg
            .parse::<f32>()
            .map(Some)
            .map_err(|_| format!("`{arg}` is not a coordinate")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(console: &mut CommandConsole, controller: &mut Controller, input: &str) -> String {
        console.respond(controller, input).unwrap()
    }

    #[test]
    fn test_blank_line_has_no_reply() {
        let mut controller = Controller::standard().unwrap();
        assert_eq!(CommandConsole::new().respond(&mut controller, "   "), None);
    }

    #[test]
    fn test_find_lists_objects() {
        let mut controller = Controller::standard().unwrap();
        let mut console = CommandConsole::new();

        let reply = run(&mut console, &mut controller, "find_objects kind=pyramid color=green");
        assert_eq!(reply, "pyramid#4[color=green, size=small, height=short, width=narrow]");

        let reply = run(&mut console, &mut controller, "find flavor=sweet");
        assert_eq!(reply, "error: unknown tag `flavor`");
    }

    #[test]
    fn test_pick_up_through_commands() {
        let mut controller = Controller::standard().unwrap();
        let mut console = CommandConsole::new();

        for command in ["move -0.25 -0.2", "lower", "close_grasper", "raise 0"] {
            assert_eq!(run(&mut console, &mut controller, command), "ok");
        }

        assert_eq!(
            run(&mut console, &mut controller, "get_grasped_object"),
            "pyramid#4[color=green, size=small, height=short, width=narrow]"
        );
        assert_eq!(run(&mut console, &mut controller, "get_object_tag 4 resting_on"), "none");
        assert!(run(&mut console, &mut controller, "tag 4 grasped_by").starts_with("grasper#0["));
        assert_eq!(run(&mut console, &mut controller, "tag 4 grasped"), "none");
    }

    #[test]
    fn test_move_keeps_axis_given_as_dash() {
        let mut controller = Controller::standard().unwrap();
        let mut console = CommandConsole::new();

        assert_eq!(run(&mut console, &mut controller, "move_grasper - 0.3"), "ok");
        assert_eq!(run(&mut console, &mut controller, "position 0"), "(0.000, 0.300, 0.500)");

        assert_eq!(run(&mut console, &mut controller, "move -0.2 -"), "ok");
        assert_eq!(run(&mut console, &mut controller, "position 0"), "(-0.200, 0.300, 0.500)");

        assert_eq!(run(&mut console, &mut controller, "move -"), "error: expected x and y coordinates");
    }

    #[test]
    fn test_tag_reference_names_the_object() {
        let mut controller = Controller::standard().unwrap();
        let mut console = CommandConsole::new();

        assert_eq!(
            run(&mut console, &mut controller, "tag 4 resting_on"),
            "block#3[color=red, size=small, height=short, width=narrow]"
        );
        assert_eq!(run(&mut console, &mut controller, "tag 3 graspable"), "true");
    }

    #[test]
    fn test_errors_are_reported_as_text() {
        let mut controller = Controller::standard().unwrap();
        let mut console = CommandConsole::new();

        assert_eq!(run(&mut console, &mut controller, "move 3 0"), "error: grasper 0 cannot reach (3, 0)");
        assert_eq!(run(&mut console, &mut controller, "move x 0"), "error: `x` is not a coordinate");
        assert_eq!(
            run(&mut console, &mut controller, "close 2"),
            "error: object 2 is a block, expected a grasper"
        );
        assert!(run(&mut console, &mut controller, "dance").starts_with("error: unknown command"));
    }

    #[test]
    fn test_exit_finishes_console() {
        let mut controller = Controller::standard().unwrap();
        let mut console = CommandConsole::new();

        assert!(!console.is_finished());
        run(&mut console, &mut controller, "exit");
        assert!(console.is_finished());
    }
}
