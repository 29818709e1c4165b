use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use memoslug::slugs::crop;
use memoslug::{Column, DataType, InMemoryDB, Model, Record, SlugField, SlugSettings, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "memoslug", version, about = "Generate unique slugs for records")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Slugify text with the configured transform
    Slugify {
        /// Crop the result to this many characters
        #[arg(long)]
        max_length: Option<usize>,

        /// Words to slugify; joined with spaces
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Save a JSON array of records and print them with slugs assigned
    Assign {
        /// JSON file holding an array of flat objects
        #[arg(long, short = 'i')]
        input: PathBuf,

        /// Column the slug is derived from
        #[arg(long, short = 'p')]
        populate_from: String,

        /// Scope lookup, e.g. `date__month`; repeatable
        #[arg(long, short = 'u')]
        unique_with: Vec<String>,

        /// Separator before the numeric suffix
        #[arg(long)]
        separator: Option<String>,

        #[arg(long)]
        max_length: Option<usize>,

        /// Name of the slug column in the output
        #[arg(long, default_value = "slug")]
        field: String,

        /// Model name, used as the slug when a source value is empty
        #[arg(long, default_value = "record")]
        model: String,
    },
}

/// Arguments of the `assign` subcommand.
#[derive(Debug, Clone)]
pub struct AssignArgs {
    pub input: PathBuf,
    pub populate_from: String,
    pub unique_with: Vec<String>,
    pub separator: Option<String>,
    pub max_length: Option<usize>,
    pub field: String,
    pub model: String,
}

pub struct App {
    settings: SlugSettings,
}

impl App {
    pub fn new(settings: SlugSettings) -> Self {
        Self { settings }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let settings = SlugSettings::from_env().map_err(anyhow::Error::msg)?;
        Ok(Self::new(settings))
    }

    pub fn run(&self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::Slugify { max_length, text } => {
                println!("{}", self.slugify(&text.join(" "), max_length));
            }
            Command::Assign {
                input,
                populate_from,
                unique_with,
                separator,
                max_length,
                field,
                model,
            } => {
                let records = self.assign(&AssignArgs {
                    input,
                    populate_from,
                    unique_with,
                    separator,
                    max_length,
                    field,
                    model,
                })?;
                println!("{}", serde_json::to_string_pretty(&records)?);
            }
        }
        Ok(())
    }

    pub fn slugify(&self, text: &str, max_length: Option<usize>) -> String {
        let max = max_length.unwrap_or(self.settings.max_length);
        crop(&self.settings.slugify.apply(text), max)
    }

    /// Save every input record in order; later records see earlier slugs.
    pub fn assign(&self, args: &AssignArgs) -> anyhow::Result<Vec<BTreeMap<String, Value>>> {
        let rows = read_rows(&args.input)?;

        let mut settings = self.settings.clone();
        if let Some(separator) = &args.separator {
            settings = settings.separator(separator);
        }
        if let Some(max) = args.max_length {
            settings = settings.max_length(max);
        }
        settings.validate().map_err(anyhow::Error::msg)?;

        let mut field = SlugField::with_settings(&args.field, &settings).populate_from(&args.populate_from);
        for lookup in &args.unique_with {
            field = field.unique_with(lookup);
        }

        let mut builder = Model::builder(&args.model);
        for column in infer_columns(&rows, &args.field)? {
            builder = builder.column(column);
        }
        let db = InMemoryDB::new();
        db.register(builder.slug(field).build()?)?;

        let mut saved = Vec::with_capacity(rows.len());
        for (n, row) in rows.into_iter().enumerate() {
            let mut record = db.new_record(&args.model)?;
            for (name, value) in row {
                record.set(&name, value)?;
            }
            db.save(&mut record)
                .with_context(|| format!("record #{} could not be saved", n + 1))?;
            saved.push(to_object(&record));
        }
        info!(model = %args.model, records = saved.len(), "assigned slugs");
        Ok(saved)
    }
}

fn read_rows(path: &Path) -> anyhow::Result<Vec<BTreeMap<String, Value>>> {
    let raw = fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not a JSON array of objects", path.display()))
}

/// One blank, nullable column per input key, typed after its first
/// non-null value; keys are taken in sorted order.
fn infer_columns(rows: &[BTreeMap<String, Value>], slug: &str) -> anyhow::Result<Vec<Column>> {
    let mut types: BTreeMap<&str, Option<DataType>> = BTreeMap::new();
    for row in rows {
        for (name, value) in row {
            if name == slug {
                continue;
            }
            let seen = types.entry(name.as_str()).or_insert(None);
            let data_type = match value {
                Value::Null => continue,
                Value::Boolean(_) => DataType::Boolean,
                Value::Integer(_) => DataType::Integer,
                Value::Float(_) => DataType::Float,
                Value::Date(_) => DataType::Date,
                Value::Text(_) => DataType::Text,
            };
            match seen {
                None => *seen = Some(data_type),
                Some(DataType::Integer) if data_type == DataType::Float => *seen = Some(data_type),
                Some(DataType::Float) if data_type == DataType::Integer => {}
                Some(existing) if *existing != data_type => {
                    bail!("column '{}' mixes {} and {} values", name, existing, data_type)
                }
                Some(_) => {}
            }
        }
    }

    Ok(types
        .into_iter()
        .map(|(name, data_type)| Column::new(name, data_type.unwrap_or(DataType::Text)).blank())
        .collect())
}

fn to_object(record: &Record) -> BTreeMap<String, Value> {
    let mut object: BTreeMap<String, Value> = record
        .model()
        .schema()
        .columns()
        .iter()
        .zip(record.values())
        .map(|(column, value)| (column.name.clone(), value.clone()))
        .collect();
    if let Some(id) = record.id() {
        object.insert("id".to_string(), Value::from(id));
    }
    object
}
