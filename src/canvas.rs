use crate::utils;
use image::{Rgba, RgbaImage};
use minifb::{Key, Window, WindowOptions};
use nalgebra::Vector3;
use std::thread;
use std::time::Duration;

/// The pixel sink the render loop writes into. Channel values arrive as
/// unclamped floats, conventionally in [0, 1] but specular highlights may
/// push them higher; implementations clamp when they quantize.
pub trait Canvas {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn set_pixel(&mut self, x: u32, y: u32, red: f64, green: f64, blue: f64);

    /// Displays whatever has been accumulated so far.
    fn present(&mut self);
}

/// A canvas backed by an rgba image buffer, for rendering to files.
/// Untouched pixels stay transparent black.
pub struct ImageCanvas {
    image: RgbaImage,
}

impl ImageCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

impl Canvas for ImageCanvas {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn set_pixel(&mut self, x: u32, y: u32, red: f64, green: f64, blue: f64) {
        let quantize = |channel: f64| (channel.clamp(0.0, 1.0) * 255.0) as u8;

        self.image.put_pixel(
            x,
            y,
            Rgba([quantize(red), quantize(green), quantize(blue), 255]),
        );
    }

    fn present(&mut self) {}
}

/// A canvas backed by a packed argb buffer whose `present` opens a window
/// over the rendered image and keeps it up until escape is pressed.
pub struct WindowCanvas {
    width: u32,
    height: u32,
    buffer: Vec<u32>,
}

impl WindowCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            buffer: vec![0; (width * height) as usize],
        }
    }

    pub fn buffer(&self) -> &[u32] {
        &self.buffer
    }
}

impl Canvas for WindowCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_pixel(&mut self, x: u32, y: u32, red: f64, green: f64, blue: f64) {
        let index = (y * self.width + x) as usize;
        let color = Vector3::from([red, green, blue]).map(|channel| channel.clamp(0.0, 1.0));

        self.buffer[index] = utils::to_argb_u32(color);
    }

    fn present(&mut self) {
        println!("Rendering to window - press escape to exit.");
        let mut window = Window::new(
            "glimmer",
            self.width as usize,
            self.height as usize,
            WindowOptions::default(),
        )
        .expect("unable to open window");

        while window.is_open() && !window.is_key_down(Key::Escape) {
            window
                .update_with_buffer(&self.buffer, self.width as usize, self.height as usize)
                .expect("unable to update window buffer");

            thread::sleep(Duration::from_millis(100));
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_clamps_channels_at_the_pixel_write() {
        let mut canvas = ImageCanvas::new(2, 2);
        canvas.set_pixel(0, 0, 2.0, -1.0, 0.5);

        let image = canvas.into_image();
        let pixel = image.get_pixel(0, 0);

        assert_eq!(pixel.0, [255, 0, 127, 255]);
    }

    #[test]
    fn it_leaves_unwritten_pixels_untouched() {
        let canvas = ImageCanvas::new(2, 2);
        let image = canvas.into_image();

        assert_eq!(image.get_pixel(1, 1).0, [0, 0, 0, 0]);
    }

    #[test]
    fn it_packs_window_pixels_as_argb() {
        let mut canvas = WindowCanvas::new(2, 1);
        canvas.set_pixel(1, 0, 1.0, 0.0, 3.0);

        assert_eq!(canvas.buffer()[1], 255 << 24 | 255 << 16 | 255);
        assert_eq!(canvas.buffer()[0], 0);
    }
}
