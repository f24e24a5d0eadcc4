use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use nvx2_core::{convert_vertex_endianness, decode_components, SourceByteOrder, VertexComponentMask};
use nvx2_io::{Nvx2Reader, ReaderConfig};

const GRID: u32 = 128;

fn layout() -> VertexComponentMask {
    VertexComponentMask::COORD | VertexComponentMask::NORMAL_UB4N | VertexComponentMask::UV0_S2
}

fn put_u32(out: &mut Vec<u8>, v: u32, order: SourceByteOrder) {
    match order {
        SourceByteOrder::LittleEndian => out.extend_from_slice(&v.to_le_bytes()),
        SourceByteOrder::BigEndian => out.extend_from_slice(&v.to_be_bytes()),
    }
}

fn put_u16(out: &mut Vec<u8>, v: u16, order: SourceByteOrder) {
    match order {
        SourceByteOrder::LittleEndian => out.extend_from_slice(&v.to_le_bytes()),
        SourceByteOrder::BigEndian => out.extend_from_slice(&v.to_be_bytes()),
    }
}

/// A GRID x GRID vertex plane split into one group per row of quads.
fn grid_mesh(order: SourceByteOrder) -> Vec<u8> {
    let num_vertices = GRID * GRID;
    let quads_per_row = GRID - 1;
    let num_indices = quads_per_row * quads_per_row * 6;
    let num_groups = quads_per_row;

    let mut out = Vec::new();
    for v in [num_groups, num_vertices, 20, num_indices, 0, layout().bits()] {
        put_u32(&mut out, v, order);
    }
    for row in 0..quads_per_row {
        let indices_per_row = quads_per_row * 6;
        for v in [row * GRID, GRID * 2, row * indices_per_row, indices_per_row] {
            put_u32(&mut out, v, order);
        }
    }
    for y in 0..GRID {
        for x in 0..GRID {
            for p in [x as f32, 0.0, y as f32] {
                put_u32(&mut out, p.to_bits(), order);
            }
            out.extend_from_slice(&[128, 255, 128, 0]);
            put_u16(&mut out, (x * 32) as u16, order);
            put_u16(&mut out, (y * 32) as u16, order);
        }
    }
    for y in 0..quads_per_row {
        for x in 0..quads_per_row {
            let i = (y * GRID + x) as u16;
            let g = GRID as u16;
            for v in [i, i + g, i + 1, i + 1, i + g, i + g + 1] {
                put_u16(&mut out, v, order);
            }
        }
    }
    out
}

fn foreign_order() -> SourceByteOrder {
    match SourceByteOrder::host() {
        SourceByteOrder::LittleEndian => SourceByteOrder::BigEndian,
        SourceByteOrder::BigEndian => SourceByteOrder::LittleEndian,
    }
}

fn open_with(bytes: &[u8], config: ReaderConfig) {
    let mut reader = Nvx2Reader::new(Cursor::new(bytes));
    if reader.set_config(config).is_ok() && reader.open().is_ok() {
        black_box(reader.primitive_groups().map(<[_]>::len).unwrap_or(0));
    }
}

// ---------------------------------------------------------------------------
// Whole-file decoding
// ---------------------------------------------------------------------------

fn bench_open_host_order(c: &mut Criterion) {
    let bytes = grid_mesh(SourceByteOrder::host());
    c.bench_function("open_grid_host_order", |b| {
        b.iter(|| open_with(black_box(&bytes), ReaderConfig::new()));
    });
}

fn bench_open_foreign_order(c: &mut Criterion) {
    let bytes = grid_mesh(foreign_order());
    let config = ReaderConfig::new().with_source_byte_order(foreign_order());
    c.bench_function("open_grid_foreign_order", |b| {
        b.iter(|| open_with(black_box(&bytes), config));
    });
}

fn bench_open_raw(c: &mut Criterion) {
    let bytes = grid_mesh(SourceByteOrder::host());
    let config = ReaderConfig::new().with_raw_mode(true);
    c.bench_function("open_grid_raw", |b| {
        b.iter(|| open_with(black_box(&bytes), config));
    });
}

// ---------------------------------------------------------------------------
// Vertex conversion
// ---------------------------------------------------------------------------

fn bench_convert_vertices(c: &mut Criterion) {
    let components = decode_components(layout()).unwrap_or_default();
    let vertices = vec![0x5Au8; (GRID * GRID * 20) as usize];
    c.bench_function("convert_vertex_endianness_grid", |b| {
        b.iter(|| {
            let mut block = vertices.clone();
            let converted = convert_vertex_endianness(&mut block, 20, &components, foreign_order());
            black_box((converted.is_ok(), block))
        });
    });
}

criterion_group!(
    benches,
    bench_open_host_order,
    bench_open_foreign_order,
    bench_open_raw,
    bench_convert_vertices,
);
criterion_main!(benches);
