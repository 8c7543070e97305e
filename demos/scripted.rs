use mfp_discovery::{
	Backend, ClientBuilder, Event, EventQueue, Metadata, Mode, PrinterParameters, Realm, ScannerParameters, ServiceProto, ServiceType,
	UnitId,
};
use std::{sync::Arc, time::Duration};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Pretends to find one multi-function printer over IPv4 and, a moment later, over IPv6.
struct FakeDnssd {
	task: std::sync::Mutex<Option<JoinHandle<()>>>,
}
impl Backend for FakeDnssd {
	fn name(&self) -> &str {
		"fake-dnssd"
	}

	fn start(&self, queue: EventQueue) {
		let task = tokio::spawn(async move {
			for (variant, endpoint, scan_endpoint) in [
				("ip4", "ipp://192.168.1.20:631/ipp/print", "http://192.168.1.20:80/eSCL"),
				("ip6", "ipp://[fd00::20]:631/ipp/print", "http://[fd00::20]:80/eSCL"),
			] {
				let printer = UnitId {
					device_name: "Kyocera ECOSYS M2040dn".into(),
					realm: Realm::Dnssd,
					zone: "eth0".into(),
					variant: variant.into(),
					svc_type: ServiceType::Printer,
					svc_proto: ServiceProto::Ipp,
					..Default::default()
				};
				let scanner = UnitId {
					svc_type: ServiceType::Scanner,
					svc_proto: ServiceProto::Escl,
					..printer.clone()
				};

				queue.push(Event::AddUnit { id: printer.clone() });
				queue.push(Event::PrinterParameters {
					id: printer.clone(),
					meta: Metadata {
						make_and_model: "Kyocera ECOSYS M2040dn".into(),
						..Default::default()
					},
					printer: PrinterParameters {
						pdl: vec!["application/pdf".into(), "image/pwg-raster".into()],
						duplex: true,
						..Default::default()
					},
				});
				queue.push(Event::AddEndpoints {
					id: printer,
					endpoints: vec![endpoint.into()],
				});

				queue.push(Event::AddUnit { id: scanner.clone() });
				queue.push(Event::ScannerParameters {
					id: scanner.clone(),
					scanner: ScannerParameters::default(),
				});
				queue.push(Event::AddEndpoints {
					id: scanner,
					endpoints: vec![scan_endpoint.into()],
				});

				tokio::time::sleep(Duration::from_millis(300)).await;
			}
		});

		*self.task.lock().unwrap() = Some(task);
	}

	fn close(&self) {
		if let Some(task) = self.task.lock().unwrap().take() {
			task.abort();
		}
	}
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
	simple_logger::SimpleLogger::new().with_level(log::LevelFilter::Debug).init().unwrap();

	let shutdown = CancellationToken::new();
	let client = ClientBuilder::new().warm_up_time(Duration::from_secs(2)).build(&shutdown);

	let backend = Arc::new(FakeDnssd {
		task: std::sync::Mutex::new(None),
	});
	client.add_backend(backend.clone()).unwrap();

	let devices = client.get_devices(&shutdown, Mode::Normal).await.unwrap();
	for device in devices.iter() {
		println!("{} ({})", device.make_model, device.dnssd_name);
		println!("  addresses: {:?}", device.addrs);
		for unit in &device.print_units {
			println!("  print: {:?}", unit.endpoints);
		}
		for unit in &device.scan_units {
			println!("  scan:  {:?}", unit.endpoints);
		}
	}

	client.close().await;
	backend.close();
}
