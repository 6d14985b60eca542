use std::sync::Arc;

use arrow::array::{Date32Array, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Device {
    location: &'static str,
    device_type: &'static str,
    status: &'static str,
    cpu: f64,
    memory: f64,
    traffic: f64,
    date: NaiveDate,
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let locations = ["New York", "Los Angeles", "Chicago", "Houston"];
    // (type, cpu baseline, memory baseline, traffic baseline)
    let device_profiles = [
        ("Router", 55.0, 60.0, 800.0),
        ("Switch", 35.0, 45.0, 600.0),
        ("Firewall", 65.0, 70.0, 400.0),
        ("Server", 75.0, 80.0, 250.0),
        ("Access Point", 25.0, 35.0, 150.0),
    ];
    let start_date = NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date");

    let mut devices: Vec<Device> = Vec::new();
    for _ in 0..240 {
        let location = locations[(rng.next_u64() % locations.len() as u64) as usize];
        let (device_type, cpu_base, mem_base, traffic_base) =
            device_profiles[(rng.next_u64() % device_profiles.len() as u64) as usize];
        let status = if rng.next_f64() < 0.82 { "Online" } else { "Offline" };

        devices.push(Device {
            location,
            device_type,
            status,
            cpu: rng.gauss(cpu_base, 12.0).clamp(0.0, 100.0),
            memory: rng.gauss(mem_base, 15.0).clamp(0.0, 100.0),
            traffic: rng.gauss(traffic_base, traffic_base * 0.3).max(0.0),
            date: start_date + chrono::Days::new(rng.next_u64() % 30),
        });
    }

    write_csv(&devices, "sample_data.csv");
    write_parquet(&devices, "sample_data.parquet");
    println!("Wrote {} devices to sample_data.csv / sample_data.parquet", devices.len());
}

fn write_csv(devices: &[Device], path: &str) {
    let mut wtr = csv::Writer::from_path(path).expect("Failed to create CSV file");
    wtr.write_record([
        "Location",
        "Device Type",
        "Status",
        "CPU Usage (%)",
        "Memory Usage (%)",
        "Network Traffic (MB)",
        "Date",
    ])
    .expect("Failed to write CSV header");

    for d in devices {
        wtr.write_record([
            d.location.to_string(),
            d.device_type.to_string(),
            d.status.to_string(),
            format!("{:.1}", d.cpu),
            format!("{:.1}", d.memory),
            format!("{:.1}", d.traffic),
            d.date.format("%Y-%m-%d").to_string(),
        ])
        .expect("Failed to write CSV row");
    }
    wtr.flush().expect("Failed to flush CSV");
}

fn write_parquet(devices: &[Device], path: &str) {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid date");

    let location_array =
        StringArray::from(devices.iter().map(|d| d.location).collect::<Vec<_>>());
    let type_array =
        StringArray::from(devices.iter().map(|d| d.device_type).collect::<Vec<_>>());
    let status_array = StringArray::from(devices.iter().map(|d| d.status).collect::<Vec<_>>());
    let cpu_array = Float64Array::from(devices.iter().map(|d| d.cpu).collect::<Vec<_>>());
    let memory_array = Float64Array::from(devices.iter().map(|d| d.memory).collect::<Vec<_>>());
    let traffic_array = Float64Array::from(devices.iter().map(|d| d.traffic).collect::<Vec<_>>());
    let date_array = Date32Array::from(
        devices
            .iter()
            .map(|d| (d.date - epoch).num_days() as i32)
            .collect::<Vec<_>>(),
    );

    let schema = Arc::new(Schema::new(vec![
        Field::new("Location", DataType::Utf8, false),
        Field::new("Device Type", DataType::Utf8, false),
        Field::new("Status", DataType::Utf8, false),
        Field::new("CPU Usage (%)", DataType::Float64, false),
        Field::new("Memory Usage (%)", DataType::Float64, false),
        Field::new("Network Traffic (MB)", DataType::Float64, false),
        Field::new("Date", DataType::Date32, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(location_array),
            Arc::new(type_array),
            Arc::new(status_array),
            Arc::new(cpu_array),
            Arc::new(memory_array),
            Arc::new(traffic_array),
            Arc::new(date_array),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}
