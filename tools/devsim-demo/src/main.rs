use anyhow::{bail, ensure, Context};
use clap::Parser;
use devsim::devices::SENSOR_CMD_RESET;
use devsim::{
    CounterSensorOps, DeviceError, DeviceRegistry, DeviceType, OverlapPolicy, RegionDescriptor,
    RegistryConfig,
};

const MEMORY_REGIONS: [RegionDescriptor; 2] = [
    RegionDescriptor::new(0x1000, 1024),
    RegionDescriptor::new(0x2000, 512),
];
const SENSOR_BASE: u32 = 0x4000_0000;

#[derive(Parser, Debug)]
#[command(
    name = "devsim-demo",
    about = "Exercise the simulated device registry: memory round trip, bounds check, counter sensor."
)]
struct Args {
    /// Overlap handling for region descriptors (first-match | reject); defaults to
    /// $DEVSIM_OVERLAP_POLICY or first-match
    #[arg(long, value_name = "POLICY")]
    overlap_policy: Option<OverlapPolicy>,

    /// Number of sensor samples to read before resetting the counter
    #[arg(long, value_name = "N", default_value_t = 3)]
    sensor_reads: u32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    run(args)
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut config = RegistryConfig::from_env().context("read registry config")?;
    if let Some(policy) = args.overlap_policy {
        config.overlap_policy = policy;
    }
    println!("overlap policy: {}", config.overlap_policy);
    tracing::info!(
        overlap_policy = %config.overlap_policy,
        sensor_reads = args.sensor_reads,
        "starting demo"
    );

    let mut registry = DeviceRegistry::with_config(config);
    memory_scenario(&mut registry)?;
    sensor_scenario(&mut registry, args.sensor_reads)?;

    let devices = registry.count();
    registry.destroy_all();
    tracing::info!(devices, "registry torn down");
    println!("devices after teardown: {}", registry.count());
    Ok(())
}

fn memory_scenario(registry: &mut DeviceRegistry) -> anyhow::Result<()> {
    let dev = registry
        .create(DeviceType::Memory, 1, &MEMORY_REGIONS, None)
        .context("create memory device")?;
    println!("created {} with regions {:?}", dev.key(), dev.region_descriptors());

    let pattern: [u8; 4] = [0xAA, 0xBB, 0xCC, 0xDD];
    dev.write(0x1000, &pattern).context("write 0x1000")?;
    println!("write 0x1000: {}", hex(&pattern));

    let data = dev.read(0x1000, pattern.len()).context("read 0x1000")?;
    println!("read 0x1000: {}", hex(&data));
    ensure!(data == pattern, "read back {} after writing {}", hex(&data), hex(&pattern));

    match dev.read(0x1FFE, 4) {
        Err(err @ DeviceError::OutOfRange { .. }) => {
            tracing::debug!(%err, "boundary-spanning read refused");
            println!("read 0x1ffe: {err}");
        }
        Ok(data) => bail!("read across region boundary unexpectedly returned {}", hex(&data)),
        Err(err) => return Err(err).context("read 0x1ffe"),
    }

    ensure!(
        registry.find(DeviceType::Io, 1).is_none(),
        "lookup matched a device of another type"
    );
    Ok(())
}

fn sensor_scenario(registry: &mut DeviceRegistry, reads: u32) -> anyhow::Result<()> {
    let dev = registry
        .create(
            DeviceType::TemperatureSensor,
            0,
            &[RegionDescriptor::new(SENSOR_BASE, 4)],
            Some(Box::new(CounterSensorOps::new())),
        )
        .context("create sensor device")?;
    println!("created {}", dev.key());

    for expected in 0..reads {
        let sample = dev.read_u32(SENSOR_BASE).context("read sensor")?;
        println!("sensor sample: {sample}");
        ensure!(sample == expected, "sensor sample {sample}, expected {expected}");
    }

    dev.ioctl(SENSOR_CMD_RESET, 0).context("reset sensor")?;
    let sample = dev.read_u32(SENSOR_BASE).context("read sensor")?;
    println!("sensor sample after reset: {sample}");
    ensure!(sample == 0, "sensor counter not reset: {sample}");
    Ok(())
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
