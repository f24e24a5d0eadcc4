//! nvx2info - prints the layout and primitive groups of a legacy NVX2 mesh.

use std::io::{self, Read, Seek, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::info;
use nvx2_core::{Nvx2Error, SourceByteOrder, VertexComponent, VertexSemantic};
use nvx2_io::{Nvx2Reader, ReaderConfig};
use thiserror::Error;

#[derive(Parser)]
#[command(name = "nvx2info")]
#[command(about = "Inspect legacy NVX2 binary mesh files")]
#[command(version)]
struct Cli {
    /// Input .nvx2 file
    input: PathBuf,

    /// Byte order the file was written in
    #[arg(short, long, value_enum, default_value_t = ByteOrderArg::Host)]
    byte_order: ByteOrderArg,

    /// Read the vertex and index blocks without building buffers
    #[arg(long)]
    raw: bool,

    /// Number of vertices to dump, decoded per component
    #[arg(short = 'n', long, default_value_t = 0)]
    vertices: usize,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ByteOrderArg {
    Host,
    Little,
    Big,
}

impl From<ByteOrderArg> for SourceByteOrder {
    fn from(arg: ByteOrderArg) -> Self {
        match arg {
            ByteOrderArg::Host => SourceByteOrder::host(),
            ByteOrderArg::Little => SourceByteOrder::LittleEndian,
            ByteOrderArg::Big => SourceByteOrder::BigEndian,
        }
    }
}

#[derive(Error, Debug)]
enum InfoError {
    #[error("cannot open {path}: {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error("{0}")]
    Mesh(#[from] Nvx2Error),
    #[error("write failed: {0}")]
    Output(#[from] io::Error),
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let stdout = io::stdout();
    match run(&cli, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("nvx2info: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<(), InfoError> {
    let reader = Nvx2Reader::open_path(&cli.input).map_err(|source| InfoError::Open {
        path: cli.input.clone(),
        source,
    })?;
    info!("reading {}", cli.input.display());

    let config = ReaderConfig::new()
        .with_raw_mode(cli.raw)
        .with_source_byte_order(cli.byte_order.into());
    report(reader, config, cli.vertices, out)
}

fn report<R, W>(mut reader: Nvx2Reader<R>, config: ReaderConfig, dump: usize, out: &mut W) -> Result<(), InfoError>
where
    R: Read + Seek,
    W: Write,
{
    reader.set_config(config)?;
    reader.open()?;
    let mesh = reader.take_mesh()?;

    writeln!(out, "byte order:  {:?}", config.source_byte_order)?;
    writeln!(out, "mode:        {}", if mesh.is_raw() { "raw" } else { "buffers" })?;
    writeln!(out, "vertices:    {} x {} bytes", mesh.num_vertices(), mesh.vertex_width())?;
    writeln!(out, "indices:     {}", mesh.num_indices())?;
    writeln!(out, "edges:       {}", mesh.num_edges())?;
    writeln!(out, "mask:        {}", mesh.component_mask())?;

    writeln!(out, "components:")?;
    for c in mesh.vertex_components() {
        writeln!(out, "  +{:<3} {}", c.byte_offset, component_name(c))?;
    }

    writeln!(out, "groups:")?;
    for (i, g) in mesh.primitive_groups().iter().enumerate() {
        let vertices = g.vertex_range();
        let indices = g.index_range();
        write!(
            out,
            "  [{}] vertices {}..{} indices {}..{} ({} triangles)",
            i,
            vertices.start,
            vertices.end,
            indices.start,
            indices.end,
            g.num_primitives()
        )?;
        if g.bounding_box.is_empty() {
            writeln!(out, " bbox empty")?;
        } else {
            writeln!(out, " bbox {:?} - {:?}", g.bounding_box.min, g.bounding_box.max)?;
        }
    }

    if dump > 0 {
        let bytes = if mesh.is_raw() {
            mesh.vertex_bytes()?
        } else {
            mesh.vertex_buffer()?.data()
        };
        dump_vertices(bytes, mesh.vertex_width(), mesh.vertex_components(), dump, out)?;
    }
    Ok(())
}

fn component_name(c: &VertexComponent) -> String {
    let index = match c.semantic {
        VertexSemantic::TexCoord => c.semantic_index.to_string(),
        _ => String::new(),
    };
    format!("{:?}{} {:?}", c.semantic, index, c.format)
}

fn dump_vertices<W: Write>(
    bytes: &[u8],
    width: usize,
    components: &[VertexComponent],
    count: usize,
    out: &mut W,
) -> io::Result<()> {
    if width == 0 {
        return Ok(());
    }
    writeln!(out, "vertex data:")?;
    for (i, vertex) in bytes.chunks_exact(width).take(count).enumerate() {
        writeln!(out, "  #{}", i)?;
        for c in components {
            if let Some(values) = c.unpack(vertex) {
                let n = c.format.element_count();
                writeln!(out, "    {:<16} {:?}", component_name(c), &values[..n])?;
            }
        }
    }
    Ok(())
}
