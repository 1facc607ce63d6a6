//! ROS 2 transport for the servo pipeline.
//!
//! [`open`] creates one node with a `turtlesim/Pose` subscription and a
//! `geometry_msgs/Twist` publisher. The subscription side is an
//! [`EventSource`] that spins the node until a pose arrives; the publisher
//! side is a [`CommandSink`].
//!
//! Building this crate requires a sourced ROS 2 environment with the
//! `turtlesim` and `geometry_msgs` packages.

use std::time::Duration;

use aruco_servo_core::{
    CommandSink, EventSource, PoseEvent, SinkError, TopicConfig, TransportError, VelocityCommand,
};
use futures_util::stream::LocalBoxStream;
use futures_util::{FutureExt, StreamExt};
use log::{debug, info};
use r2r::geometry_msgs::msg::{Twist, Vector3};
use r2r::turtlesim::msg::Pose;
use r2r::QosProfile;

const SPIN_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(thiserror::Error, Debug)]
pub enum RosError {
    #[error(transparent)]
    R2r(#[from] r2r::Error),
}

/// Pose subscription that owns (and spins) the node.
pub struct RosEventSource {
    node: r2r::Node,
    poses: LocalBoxStream<'static, Pose>,
    spin_timeout: Duration,
}

/// `cmd_vel` publisher.
pub struct RosCommandSink {
    publisher: r2r::Publisher<Twist>,
    topic: String,
}

/// Create the node, its pose subscription and its command publisher.
pub fn open(topics: &TopicConfig) -> Result<(RosEventSource, RosCommandSink), RosError> {
    let ctx = r2r::Context::create()?;
    let mut node = r2r::Node::create(ctx, &topics.node_name, "")?;
    let qos = QosProfile::default().keep_last(topics.queue_depth);

    let poses = node.subscribe::<Pose>(&topics.pose, qos.clone())?.boxed_local();
    let publisher = node.create_publisher::<Twist>(&topics.cmd_vel, qos)?;
    info!(
        "node `{}` subscribed to {} and publishing to {}",
        topics.node_name, topics.pose, topics.cmd_vel
    );

    Ok((
        RosEventSource {
            node,
            poses,
            spin_timeout: SPIN_TIMEOUT,
        },
        RosCommandSink {
            publisher,
            topic: topics.cmd_vel.clone(),
        },
    ))
}

impl EventSource for RosEventSource {
    fn next_event(&mut self) -> Result<Option<PoseEvent>, TransportError> {
        loop {
            if let Some(msg) = self.poses.next().now_or_never() {
                return Ok(msg.as_ref().map(pose_event));
            }
            self.node.spin_once(self.spin_timeout);
        }
    }
}

impl CommandSink for RosCommandSink {
    fn publish(&mut self, command: &VelocityCommand) -> Result<(), SinkError> {
        self.publisher
            .publish(&twist(command))
            .map_err(|e| SinkError::Backend(Box::new(e)))?;
        debug!("published linear.x={} on {}", command.linear.x, self.topic);
        Ok(())
    }
}

pub fn pose_event(msg: &Pose) -> PoseEvent {
    PoseEvent {
        x: msg.x,
        y: msg.y,
        theta: msg.theta,
        linear_velocity: msg.linear_velocity,
        angular_velocity: msg.angular_velocity,
    }
}

pub fn twist(command: &VelocityCommand) -> Twist {
    let v = |c: &aruco_servo_core::Vector3| Vector3 {
        x: c.x,
        y: c.y,
        z: c.z,
    };
    Twist {
        linear: v(&command.linear),
        angular: v(&command.angular),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_maps_onto_twist_fields() {
        let msg = twist(&VelocityCommand::linear_x(-5.0));
        assert_eq!(msg.linear.x, -5.0);
        assert_eq!(msg.linear.y, 0.0);
        assert_eq!(msg.linear.z, 0.0);
        assert_eq!(msg.angular.x, 0.0);
        assert_eq!(msg.angular.y, 0.0);
        assert_eq!(msg.angular.z, 0.0);
    }

    #[test]
    fn pose_payload_is_carried_over() {
        let msg = Pose {
            x: 5.5,
            y: 1.25,
            theta: 0.5,
            linear_velocity: 2.0,
            angular_velocity: -1.0,
        };
        let event = pose_event(&msg);
        assert_eq!(event.x, 5.5);
        assert_eq!(event.y, 1.25);
        assert_eq!(event.theta, 0.5);
        assert_eq!(event.linear_velocity, 2.0);
        assert_eq!(event.angular_velocity, -1.0);
    }
}
