//! Console itinerary report

use std::fmt::Write;

use chrono::NaiveTime;
use efficient_core::{
    Time,
    routing::{Journey, Leg, Objective, Waypoint},
};

const SECONDS_PER_DAY: Time = 24 * 3600;

fn clock(seconds: Time) -> String {
    NaiveTime::from_num_seconds_from_midnight_opt(seconds % SECONDS_PER_DAY, 0)
        .map_or_else(|| format!("{seconds}s"), |t| t.format("%I:%M %p").to_string())
}

fn place(waypoint: &Waypoint) -> String {
    format!(
        "{} ({:.6}, {:.6})",
        waypoint.name,
        waypoint.location.y(),
        waypoint.location.x()
    )
}

fn minutes(seconds: Time) -> f64 {
    f64::from(seconds) / 60.0
}

/// Renders `journey` the way it is printed on the console
pub fn render(journey: &Journey, objective: Objective) -> String {
    let itinerary = &journey.itinerary;
    let mut out = String::new();

    let headline = match objective {
        Objective::ShortestDistance => {
            format!("Shortest path found: {:.3} km", journey.objective_value)
        }
        Objective::FastestArrival => format!(
            "Fastest path found with travel time: {:.1} minutes",
            minutes(itinerary.totals.elapsed.unwrap_or_default())
        ),
        _ => format!("Cheapest path found with cost: ৳{:.2}", itinerary.totals.cost),
    };
    let _ = writeln!(out, "{headline}\n");

    if let Some(departure) = itinerary.departure {
        let _ = writeln!(out, "Start Time: {}", clock(departure));
    }

    for leg in &itinerary.legs {
        let stamp = leg
            .timing()
            .map(|t| format!("[{}] ", clock(t.departure)))
            .unwrap_or_default();
        let duration = leg
            .timing()
            .map(|t| format!(", Time: {:.1} min", minutes(t.duration())))
            .unwrap_or_default();

        let line = match leg {
            Leg::Walk {
                from, to, distance, ..
            } => format!(
                "Walk from {} to {}, Distance: {distance:.3} km{duration}, Cost: ৳0.00",
                place(from),
                place(to)
            ),
            Leg::Ride {
                mode,
                from,
                to,
                distance,
                cost,
                ..
            } => format!(
                "Ride {mode} from {} to {}, Distance: {distance:.3} km{duration}, Cost: ৳{cost:.2}",
                place(from),
                place(to)
            ),
            Leg::Waiting { mode, timing, .. } => {
                format!("Wait for {mode}: {:.0} minutes", minutes(timing.duration()))
            }
        };
        let _ = writeln!(out, "{stamp}{line}");
    }

    if let Some(arrival) = itinerary.arrival {
        let _ = writeln!(out, "\nArrival Time: {}", clock(arrival));
    } else {
        out.push('\n');
    }
    let _ = writeln!(out, "Total Distance: {:.3} km", itinerary.totals.distance);
    if let Some(elapsed) = itinerary.totals.elapsed {
        let total = minutes(elapsed);
        let _ = writeln!(
            out,
            "Total Travel Time: {total:.1} minutes ({:.1} hours)",
            total / 60.0
        );
    }
    let _ = writeln!(out, "Total Cost: ৳{:.2}", itinerary.totals.cost);
    out
}

#[cfg(test)]
mod tests {
    use efficient_core::prelude::*;
    use geo::Point;

    use super::*;

    #[test]
    fn clock_wraps_past_midnight() {
        assert_eq!(clock(9 * 3600 + 30 * 60), "09:30 AM");
        assert_eq!(clock(17 * 3600 + 43 * 60), "05:43 PM");
        assert_eq!(clock(SECONDS_PER_DAY + 60), "12:01 AM");
    }

    #[test]
    fn renders_timed_journey() {
        let mut network = Network::new(NetworkConfig::default());
        let a = network.find_or_add_node(Point::new(90.40, 23.78)).unwrap();
        let b = network.find_or_add_node(Point::new(90.41, 23.78)).unwrap();
        let c = network.find_or_add_node(Point::new(90.42, 23.78)).unwrap();
        network.connect(a, b, Mode::Car, 1.0).unwrap();
        network.connect(b, c, Mode::Metro, 1.0).unwrap();

        let query = Query::new(
            Point::new(90.40, 23.78),
            Point::new(90.42, 23.78),
            Objective::CheapestScheduled,
        )
        .departing_at(TimeOfDay::from_hm(8, 0).unwrap());
        let journey = route(&network, &query).unwrap();
        let text = render(&journey, query.objective);

        assert!(text.contains("Start Time: 08:00 AM"));
        assert!(text.contains("[08:02 AM] Wait for Metro: 8 minutes"));
        assert!(text.contains("[08:10 AM] Ride Metro from Node 1"));
        assert!(text.contains("Arrival Time: 08:12 AM"));
        assert!(text.contains("Total Cost: ৳25.00"));
    }
}
