/// Model and scene file parser
use std::fs;
use std::path::{Path, PathBuf};

use nalgebra::Vector3;
use nom::{
    bytes::complete::take_till1,
    character::complete::{char, digit1, i32 as int32, space0},
    combinator::{all_consuming, map, map_res},
    number::complete::float,
    sequence::{delimited, tuple},
    IResult,
};
use tracing::{debug, info, warn};

use crate::error::{GeometryError, LoadError};
use crate::geometry::{Face, Model, Vertex};
use crate::scene::Scene;
use crate::transform::{RotationState, Transform};

const VERTICES_HEADER: &str = "Model Vertices";
const FACES_HEADER: &str = "Model Faces";
const PLAYER_HEADER: &str = "-Player-";
const MODELS_HEADER: &str = "-Models-";

/// Raw buffers read from a model file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelData {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
}

impl ModelData {
    pub fn into_model(self, name: impl Into<String>) -> Result<Model, GeometryError> {
        Model::new(name, self.vertices, self.faces)
    }
}

/// One model entry of a scene file.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPlacement {
    pub name: String,
    pub position: Vector3<f32>,
    pub rotation: RotationState,
    pub scale: f32,
}

/// Parsed scene file: player start plus model placements.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDescription {
    pub player: Vector3<f32>,
    pub models: Vec<ModelPlacement>,
}

/// Non-empty lines with their 1-based numbers. Any line holding `#` is a
/// comment and is dropped whole.
fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.contains('#'))
}

fn comma(input: &str) -> IResult<&str, char> {
    delimited(space0, char(','), space0)(input)
}

fn coord(input: &str) -> IResult<&str, f32> {
    delimited(space0, float, space0)(input)
}

fn vector3(input: &str) -> IResult<&str, Vector3<f32>> {
    map(
        tuple((coord, comma, coord, comma, coord)),
        |(x, _, y, _, z)| Vector3::new(x, y, z),
    )(input)
}

fn index(input: &str) -> IResult<&str, usize> {
    map_res(digit1, |digits: &str| digits.parse::<usize>())(input)
}

fn face(input: &str) -> IResult<&str, Face> {
    map(
        tuple((
            index, comma, index, comma, index, comma, int32, comma, int32, comma, int32,
        )),
        |(i1, _, i2, _, i3, _, r, _, g, _, b)| Face::new(i1, i2, i3, r, g, b),
    )(input)
}

fn placement(input: &str) -> IResult<&str, ModelPlacement> {
    map(
        tuple((
            take_till1(|c| c == ','),
            comma,
            vector3,
            comma,
            vector3,
            comma,
            coord,
        )),
        |(name, _, position, _, rotation, _, scale)| ModelPlacement {
            name: name.trim().to_string(),
            position,
            rotation: RotationState::new(rotation.x, rotation.y, rotation.z),
            scale,
        },
    )(input)
}

fn parse_line<'a, T>(
    what: &'static str,
    line: usize,
    input: &'a str,
    parser: impl FnMut(&'a str) -> IResult<&'a str, T>,
) -> Result<T, LoadError> {
    all_consuming(parser)(input)
        .map(|(_, value)| value)
        .map_err(|e| LoadError::Parse {
            what,
            line,
            message: e.to_string(),
        })
}

fn missing(what: &'static str, line: usize, header: &str) -> LoadError {
    LoadError::Parse {
        what,
        line,
        message: format!("expected `{header}`"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Start,
    First,
    Second,
}

/// Parse a model file: vertex lines `x,y,z` under `Model Vertices`, then face
/// lines `i1,i2,i3,r,g,b` under `Model Faces`.
pub fn parse_model(text: &str) -> Result<ModelData, LoadError> {
    const WHAT: &str = "model";
    let mut data = ModelData::default();
    let mut section = Section::Start;
    let mut last = 0;

    for (line, content) in content_lines(text) {
        last = line;
        match (section, content) {
            (Section::Start, VERTICES_HEADER) => section = Section::First,
            (Section::Start, _) => return Err(missing(WHAT, line, VERTICES_HEADER)),
            (Section::First, FACES_HEADER) => section = Section::Second,
            (Section::First, _) => data.vertices.push(parse_line(WHAT, line, content, vector3)?),
            (Section::Second, _) => data.faces.push(parse_line(WHAT, line, content, face)?),
        }
    }

    match section {
        Section::Start => Err(missing(WHAT, last, VERTICES_HEADER)),
        Section::First => Err(missing(WHAT, last, FACES_HEADER)),
        Section::Second => Ok(data),
    }
}

/// Parse a scene file: one `x,y,z` line under `-Player-`, then placements
/// `name, x, y, z, x_rot, y_rot, z_rot, scale` under `-Models-`.
pub fn parse_scene(text: &str) -> Result<SceneDescription, LoadError> {
    const WHAT: &str = "scene";
    let mut player = None;
    let mut models = Vec::new();
    let mut section = Section::Start;
    let mut last = 0;

    for (line, content) in content_lines(text) {
        last = line;
        match (section, content) {
            (Section::Start, PLAYER_HEADER) => section = Section::First,
            (Section::Start, _) => return Err(missing(WHAT, line, PLAYER_HEADER)),
            (Section::First, MODELS_HEADER) => section = Section::Second,
            (Section::First, _) if player.is_some() => {
                return Err(LoadError::Parse {
                    what: WHAT,
                    line,
                    message: "player position given twice".to_string(),
                })
            }
            (Section::First, _) => player = Some(parse_line(WHAT, line, content, vector3)?),
            (Section::Second, _) => models.push(parse_line(WHAT, line, content, placement)?),
        }
    }

    match (section, player) {
        (Section::Start, _) => Err(missing(WHAT, last, PLAYER_HEADER)),
        (Section::First, _) => Err(missing(WHAT, last, MODELS_HEADER)),
        (Section::Second, None) => Err(LoadError::Parse {
            what: WHAT,
            line: last,
            message: "missing player position".to_string(),
        }),
        (Section::Second, Some(player)) => Ok(SceneDescription { player, models }),
    }
}

/// Reads model files from a directory and populates scenes with them.
#[derive(Debug, Clone)]
pub struct SceneLoader {
    models_dir: PathBuf,
}

impl SceneLoader {
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
        }
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    /// Read and validate `<models_dir>/<name>`.
    pub fn load_model(&self, name: &str) -> Result<Model, LoadError> {
        let path = self.models_dir.join(name);
        let text = fs::read_to_string(&path).map_err(|e| LoadError::io(&path, e))?;
        let model = parse_model(&text)?.into_model(name)?;

        let out_of_range = model
            .faces()
            .iter()
            .filter(|f| f.color.clamped().map(i32::from) != [f.color.r, f.color.g, f.color.b])
            .count();
        if out_of_range > 0 {
            warn!(name, out_of_range, "face colors outside 0..=255 will be clamped");
        }
        debug!(
            name,
            vertices = model.vertices().len(),
            faces = model.faces().len(),
            "model parsed"
        );
        Ok(model)
    }

    /// Load the placement's model, scale it and put it in place.
    ///
    /// The placement's angles are recorded on the model; the vertices are not
    /// rotated by them.
    pub fn instantiate(&self, placement: &ModelPlacement) -> Result<Model, LoadError> {
        let mut model = self.load_model(&placement.name)?;
        Transform::scale_vertices(&mut model, placement.scale);
        model.rotation = placement.rotation;
        let p = placement.position;
        Transform::translate_to(&mut model, p.x, p.y, p.z);
        model.solid = true;
        Ok(model)
    }

    /// Replace the contents of `scene` with the scene file at `path`.
    ///
    /// Every model is loaded before the scene is touched, so a failure leaves
    /// it as it was. Returns the player start position.
    pub fn load_scene(
        &self,
        path: impl AsRef<Path>,
        scene: &mut Scene,
    ) -> Result<Vector3<f32>, LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        let description = parse_scene(&text)?;

        let models = description
            .models
            .iter()
            .map(|placement| self.instantiate(placement))
            .collect::<Result<Vec<_>, _>>()?;

        scene.clear();
        for model in models {
            scene.insert(model);
        }
        info!(path = %path.display(), models = scene.len(), "scene loaded");
        Ok(description.player)
    }
}
